//! Banner configuration model.
//!
//! These are the structures the banner editor produces and the calculator
//! consumes. Field names on the wire are camelCase (`totalMultis`,
//! `appliesToMultis`, `universalBaseRate`, ...) and analysis targets carry a
//! `type` tag of `single_unit` or `custom_group`.
//!
//! Numbers typed by the user are kept as [`LooseNumber`] and only parsed
//! when a calculation needs them, so a half-edited banner still loads.

use crate::error::BannerError;
use crate::id::{AnalysisId, BannerId, StepId, UnitId};
use crate::numeric::{percent_to_probability, positive_int_or, LooseNumber, STANDARD_MULTI_GEM_COST};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A purchase step: the set of multis sharing one gem cost and one
/// rate-override regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,

    /// 1-based multi indices this step applies to.
    #[serde(default, deserialize_with = "deserialize_multi_set")]
    pub applies_to_multis: BTreeSet<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gem_cost: Option<LooseNumber>,
}

impl Step {
    /// Create a step covering `multis` at `gem_cost` gems per multi.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::Step;
    ///
    /// let step = Step::new("step_1", [1, 2, 3], 25);
    /// assert!(step.applies_to(2));
    /// assert!(!step.applies_to(4));
    /// assert_eq!(step.gem_cost(), 25);
    /// ```
    pub fn new(
        id: impl Into<StepId>,
        multis: impl IntoIterator<Item = u32>,
        gem_cost: u32,
    ) -> Self {
        Self {
            id: id.into(),
            applies_to_multis: multis.into_iter().collect(),
            gem_cost: Some(LooseNumber::from(gem_cost)),
        }
    }

    /// Whether this step covers the given multi index.
    pub fn applies_to(&self, multi: u32) -> bool {
        self.applies_to_multis.contains(&multi)
    }

    /// Gem cost of one multi in this step; missing, invalid or non-positive
    /// costs fall back to the standard 50.
    pub fn gem_cost(&self) -> u32 {
        positive_int_or(self.gem_cost.as_ref(), STANDARD_MULTI_GEM_COST)
    }
}

/// Accept any JSON array and keep the entries that read as positive integers.
fn deserialize_multi_set<'de, D>(deserializer: D) -> Result<BTreeSet<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::Number(n) => n.as_f64().map(LooseNumber::Number),
            serde_json::Value::String(s) => Some(LooseNumber::Text(s)),
            _ => None,
        })
        .filter_map(|n| n.to_int())
        .filter(|n| *n > 0)
        .filter_map(|n| u32::try_from(n).ok())
        .collect())
}

/// Per-step rates for one unit, replacing its universal rate on that step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOverride {
    pub global_step_def_id: StepId,

    /// Per-draw rate (percent) of the ten base draws.
    #[serde(
        rename = "baseRate10Pulls",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub base_rate_10_pulls: Option<LooseNumber>,

    /// Rate (percent) of the final poster draw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_poster_rate: Option<LooseNumber>,
}

impl StepOverride {
    /// Base rate as a probability; absent or invalid reads as 0.
    pub fn base_rate(&self) -> f64 {
        percent_to_probability(self.base_rate_10_pulls.as_ref())
    }

    /// Final poster rate as a probability; absent or invalid reads as 0.
    pub fn final_poster_rate(&self) -> f64 {
        percent_to_probability(self.final_poster_rate.as_ref())
    }
}

/// A pullable unit with a universal rate and optional per-step overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,

    #[serde(default)]
    pub name: String,

    /// Percentage applied whenever no step override exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universal_base_rate: Option<LooseNumber>,

    #[serde(default)]
    pub step_overrides: Vec<StepOverride>,
}

impl Unit {
    /// Create a unit with a universal rate given in percent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::Unit;
    ///
    /// let unit = Unit::new("unit_1", "Dragon Knight", 0.5)
    ///     .with_override("step_1", 0.5, 3.0);
    ///
    /// assert_eq!(unit.universal_rate(), 0.005);
    /// assert_eq!(unit.override_for(&"step_1".into()).unwrap().final_poster_rate(), 0.03);
    /// ```
    pub fn new(id: impl Into<UnitId>, name: impl Into<String>, universal_percent: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            universal_base_rate: Some(LooseNumber::from(universal_percent)),
            step_overrides: Vec::new(),
        }
    }

    /// Add a step override with base and final poster rates in percent.
    pub fn with_override(
        mut self,
        step: impl Into<StepId>,
        base_percent: f64,
        final_poster_percent: f64,
    ) -> Self {
        self.step_overrides.push(StepOverride {
            global_step_def_id: step.into(),
            base_rate_10_pulls: Some(LooseNumber::from(base_percent)),
            final_poster_rate: Some(LooseNumber::from(final_poster_percent)),
        });
        self
    }

    /// Universal rate as a probability. The same value stands in for both
    /// the base rate and the final poster rate.
    pub fn universal_rate(&self) -> f64 {
        percent_to_probability(self.universal_base_rate.as_ref())
    }

    /// First override registered for `step`, if any.
    pub fn override_for(&self, step: &StepId) -> Option<&StepOverride> {
        self.step_overrides
            .iter()
            .find(|o| &o.global_step_def_id == step)
    }
}

/// One weighted member of a custom group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unset while the user has not picked a unit yet.
    #[serde(default)]
    pub unit_id: Option<UnitId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<LooseNumber>,
}

impl Constituent {
    /// A constituent for `unit_id` weighted by `multiplier`.
    pub fn new(unit_id: impl Into<UnitId>, multiplier: u32) -> Self {
        Self {
            id: None,
            unit_id: Some(unit_id.into()),
            multiplier: Some(LooseNumber::from(multiplier)),
        }
    }

    /// Rate weight; missing, invalid or non-positive reads as 1.
    pub fn multiplier(&self) -> u32 {
        positive_int_or(self.multiplier.as_ref(), 1)
    }
}

/// What an analysis measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisTarget {
    /// A single unit.
    SingleUnit {
        #[serde(rename = "unitId")]
        unit_id: UnitId,
    },
    /// Any of several units, with rates summed by multiplier.
    CustomGroup {
        #[serde(default)]
        constituents: Vec<Constituent>,
    },
}

impl AnalysisTarget {
    /// Unit ids referenced by this target, in order.
    pub fn unit_ids(&self) -> Vec<&UnitId> {
        match self {
            AnalysisTarget::SingleUnit { unit_id } => vec![unit_id],
            AnalysisTarget::CustomGroup { constituents } => constituents
                .iter()
                .filter_map(|c| c.unit_id.as_ref())
                .collect(),
        }
    }
}

/// A named analysis target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnalysisId>,

    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub target: AnalysisTarget,
}

impl Analysis {
    /// Analysis of one unit, named after it.
    pub fn single_unit(name: impl Into<String>, unit_id: impl Into<UnitId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            target: AnalysisTarget::SingleUnit {
                unit_id: unit_id.into(),
            },
        }
    }

    /// Analysis of a weighted group of units.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::{Analysis, AnalysisTarget, Constituent};
    ///
    /// let group = Analysis::custom_group(
    ///     "Either Featured",
    ///     vec![Constituent::new("unit_1", 1), Constituent::new("unit_2", 2)],
    /// );
    /// assert_eq!(group.target.unit_ids().len(), 2);
    /// assert!(matches!(group.target, AnalysisTarget::CustomGroup { .. }));
    /// ```
    pub fn custom_group(name: impl Into<String>, constituents: Vec<Constituent>) -> Self {
        Self {
            id: None,
            name: name.into(),
            target: AnalysisTarget::CustomGroup { constituents },
        }
    }

    /// Label used for colors, chart legends and CSV blocks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::Analysis;
    ///
    /// let analysis = Analysis::single_unit("Dragon Knight", "unit_1");
    /// assert_eq!(analysis.full_name("Summer Fest"), "Summer Fest - Dragon Knight");
    /// ```
    pub fn full_name(&self, banner_name: &str) -> String {
        format!("{} - {}", banner_name, self.name)
    }
}

/// A banner as edited: steps, units and the custom groups to analyse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,

    #[serde(default)]
    pub name: String,

    /// Number of multis to chart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_multis: Option<LooseNumber>,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub units: Vec<Unit>,

    #[serde(default)]
    pub custom_analyses: Vec<Analysis>,
}

impl Banner {
    /// Create an empty banner.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sugostat::{Banner, Step, Unit};
    ///
    /// let banner = Banner::new("banner_1", "Summer Fest", 30)
    ///     .with_step(Step::new("step_1", [1], 25))
    ///     .with_unit(Unit::new("unit_1", "Dragon Knight", 0.5));
    ///
    /// assert_eq!(banner.horizon(30), 30);
    /// assert_eq!(banner.analyses().len(), 1);
    /// ```
    pub fn new(id: impl Into<BannerId>, name: impl Into<String>, total_multis: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            total_multis: Some(LooseNumber::from(total_multis)),
            steps: Vec::new(),
            units: Vec::new(),
            custom_analyses: Vec::new(),
        }
    }

    /// Add a step definition.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Add a custom group analysis.
    pub fn with_group(mut self, group: Analysis) -> Self {
        self.custom_analyses.push(group);
        self
    }

    /// Number of multis to chart, or `default` when unset or invalid.
    pub fn horizon(&self, default: u32) -> u32 {
        positive_int_or(self.total_multis.as_ref(), default)
    }

    /// First unit with the given id.
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| &u.id == id)
    }

    /// Analyses to run for this banner: one per unit, then every custom
    /// group that still has a constituent with a unit selected.
    ///
    /// Constituents without a unit are removed from the returned groups.
    pub fn analyses(&self) -> Vec<Analysis> {
        let singles = self
            .units
            .iter()
            .map(|u| Analysis::single_unit(u.name.clone(), u.id.clone()));

        let groups = self.custom_analyses.iter().filter_map(|analysis| {
            match &analysis.target {
                AnalysisTarget::SingleUnit { .. } => Some(analysis.clone()),
                AnalysisTarget::CustomGroup { constituents } => {
                    let kept: Vec<Constituent> = constituents
                        .iter()
                        .filter(|c| c.unit_id.is_some())
                        .cloned()
                        .collect();
                    if kept.is_empty() {
                        debug!(
                            "Skipping custom group '{}' on banner '{}': no units selected",
                            analysis.name, self.name
                        );
                        return None;
                    }
                    Some(Analysis {
                        id: analysis.id.clone(),
                        name: analysis.name.clone(),
                        target: AnalysisTarget::CustomGroup { constituents: kept },
                    })
                }
            }
        });

        singles.chain(groups).collect()
    }

    /// Check the configuration invariants.
    ///
    /// Calculation does not require a valid banner (the resolver falls back
    /// to defaults), but an editor can use this to flag mistakes.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, checking in order: horizon,
    /// overlapping steps, unit overrides, then custom groups.
    pub fn validate(&self) -> Result<(), BannerError> {
        if let Some(total) = &self.total_multis {
            if !total.to_int().is_some_and(|n| n > 0) {
                return Err(BannerError::InvalidHorizon(total.to_string()));
            }
        }

        let mut claimed: HashMap<u32, &StepId> = HashMap::new();
        for step in &self.steps {
            for multi in &step.applies_to_multis {
                if let Some(first) = claimed.insert(*multi, &step.id) {
                    return Err(BannerError::OverlappingSteps {
                        multi: *multi,
                        first: first.clone(),
                        second: step.id.clone(),
                    });
                }
            }
        }

        let step_ids: HashSet<&StepId> = self.steps.iter().map(|s| &s.id).collect();
        for unit in &self.units {
            let mut seen = HashSet::new();
            for step_override in &unit.step_overrides {
                let step = &step_override.global_step_def_id;
                if !step_ids.contains(step) {
                    return Err(BannerError::UnknownStep {
                        unit: unit.id.clone(),
                        step: step.clone(),
                    });
                }
                if !seen.insert(step) {
                    return Err(BannerError::DuplicateOverride {
                        unit: unit.id.clone(),
                        step: step.clone(),
                    });
                }
            }
        }

        for analysis in &self.custom_analyses {
            let unit_ids = analysis.target.unit_ids();
            if unit_ids.is_empty() {
                return Err(BannerError::EmptyGroup(analysis.name.clone()));
            }
            if let Some(missing) = unit_ids.into_iter().find(|id| self.unit(id).is_none()) {
                return Err(BannerError::UnknownUnit {
                    analysis: analysis.name.clone(),
                    unit: missing.clone(),
                });
            }
        }

        Ok(())
    }

    /// Parse a single banner from JSON.
    pub fn from_json(json: &str) -> Result<Self, BannerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a saved setup (a JSON array of banners).
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, BannerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BannerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_banner() -> Banner {
        Banner::new("b1", "Fest", 30)
            .with_step(Step::new("s1", [1, 2], 25))
            .with_step(Step::new("s2", [3], 50))
            .with_unit(Unit::new("u1", "Alpha", 0.5).with_override("s1", 1.0, 3.0))
            .with_unit(Unit::new("u2", "Beta", 0.25))
            .with_group(Analysis::custom_group(
                "Either",
                vec![Constituent::new("u1", 1), Constituent::new("u2", 2)],
            ))
    }

    #[test]
    fn test_deserialize_editor_banner() {
        let json = r#"{
            "id": "banner_1",
            "name": "Fest",
            "totalMultis": 20,
            "steps": [{"id": "step_1", "appliesToMultis": [1, "2", null, 0], "gemCost": "25"}],
            "units": [{
                "id": "unit_1",
                "name": "Alpha",
                "universalBaseRate": "0.500",
                "stepOverrides": [
                    {"globalStepDefId": "step_1", "baseRate10Pulls": "1", "finalPosterRate": 3}
                ]
            }],
            "customAnalyses": [{
                "id": "analysis_1",
                "name": "Group",
                "type": "custom_group",
                "constituents": [
                    {"id": "c1", "unitId": "unit_1", "multiplier": 2},
                    {"id": "c2", "unitId": null, "multiplier": 1}
                ]
            }]
        }"#;

        let banner = Banner::from_json(json).unwrap();
        assert_eq!(banner.horizon(30), 20);
        assert_eq!(banner.steps[0].applies_to_multis, BTreeSet::from([1, 2]));
        assert_eq!(banner.steps[0].gem_cost(), 25);
        assert_eq!(banner.units[0].universal_rate(), 0.005);

        let step_override = banner.units[0].override_for(&StepId::new("step_1")).unwrap();
        assert_eq!(step_override.base_rate(), 0.01);
        assert_eq!(step_override.final_poster_rate(), 0.03);

        match &banner.custom_analyses[0].target {
            AnalysisTarget::CustomGroup { constituents } => {
                assert_eq!(constituents.len(), 2);
                assert_eq!(constituents[0].multiplier(), 2);
                assert!(constituents[1].unit_id.is_none());
            }
            other => panic!("Expected custom group, got {:?}", other),
        }
    }

    #[test]
    fn test_json_round_trip_keeps_wire_names() {
        let banner = sample_banner();
        let json = banner.to_json().unwrap();
        assert!(json.contains("\"totalMultis\""));
        assert!(json.contains("\"appliesToMultis\""));
        assert!(json.contains("\"baseRate10Pulls\""));
        assert!(json.contains("\"type\": \"custom_group\""));

        let back = Banner::from_json(&json).unwrap();
        assert_eq!(back, banner);
    }

    #[test]
    fn test_horizon_defaults() {
        let mut banner = sample_banner();
        banner.total_multis = Some(LooseNumber::from("abc"));
        assert_eq!(banner.horizon(30), 30);
        banner.total_multis = None;
        assert_eq!(banner.horizon(42), 42);
    }

    #[test]
    fn test_missing_gem_cost_and_multiplier_default() {
        let step: Step = serde_json::from_str(r#"{"id": "s", "appliesToMultis": [1]}"#).unwrap();
        assert_eq!(step.gem_cost(), 50);

        let constituent: Constituent =
            serde_json::from_str(r#"{"unitId": "u", "multiplier": "0"}"#).unwrap();
        assert_eq!(constituent.multiplier(), 1);
    }

    #[test]
    fn test_override_fields_absent_read_as_zero() {
        let step_override: StepOverride =
            serde_json::from_str(r#"{"globalStepDefId": "s1", "finalPosterRate": "2"}"#).unwrap();
        assert_eq!(step_override.base_rate(), 0.0);
        assert_eq!(step_override.final_poster_rate(), 0.02);
    }

    #[test]
    fn test_analyses_lists_units_then_groups() {
        let mut banner = sample_banner();
        banner.custom_analyses.push(Analysis::custom_group(
            "Unfinished",
            vec![Constituent {
                id: None,
                unit_id: None,
                multiplier: None,
            }],
        ));

        let analyses = banner.analyses();
        let names: Vec<&str> = analyses.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Either"]);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_banner().validate().is_ok());
    }

    #[test]
    fn test_validate_overlapping_steps() {
        let banner = sample_banner().with_step(Step::new("s3", [2], 50));
        match banner.validate() {
            Err(BannerError::OverlappingSteps { multi, first, second }) => {
                assert_eq!(multi, 2);
                assert_eq!(first.as_str(), "s1");
                assert_eq!(second.as_str(), "s3");
            }
            other => panic!("Expected OverlappingSteps, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_override() {
        let mut banner = sample_banner();
        banner.units[0] = banner.units[0].clone().with_override("s1", 2.0, 2.0);
        assert!(matches!(
            banner.validate(),
            Err(BannerError::DuplicateOverride { .. })
        ));
    }

    #[test]
    fn test_validate_unknown_references() {
        let banner = sample_banner()
            .with_unit(Unit::new("u3", "Gamma", 1.0).with_override("nope", 1.0, 1.0));
        assert!(matches!(banner.validate(), Err(BannerError::UnknownStep { .. })));

        let banner = sample_banner().with_group(Analysis::custom_group(
            "Ghost",
            vec![Constituent::new("missing", 1)],
        ));
        assert!(matches!(banner.validate(), Err(BannerError::UnknownUnit { .. })));
    }

    #[test]
    fn test_validate_empty_group_and_horizon() {
        let banner = sample_banner().with_group(Analysis::custom_group("Empty", Vec::new()));
        assert!(matches!(banner.validate(), Err(BannerError::EmptyGroup(name)) if name == "Empty"));

        let mut banner = sample_banner();
        banner.total_multis = Some(LooseNumber::from("0"));
        assert!(matches!(banner.validate(), Err(BannerError::InvalidHorizon(_))));
    }
}
