//! Calculation hand-off payload.
//!
//! When the user asks for results, the editor flattens its banners into a
//! `CalculationSetup`: one entry per banner with its units, steps and the
//! list of analyses to run. This is the JSON stored under the results key
//! and read back by the results view.

use crate::error::BannerError;
use crate::id::BannerId;
use crate::model::{Analysis, Banner, Step, Unit};
use crate::numeric::{positive_int_or, LooseNumber};
use log::debug;
use serde::{Deserialize, Serialize};

/// One banner, ready to calculate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerRun {
    pub banner_id: BannerId,

    #[serde(default)]
    pub banner_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_multis: Option<LooseNumber>,

    #[serde(default)]
    pub units: Vec<Unit>,

    #[serde(default)]
    pub step_definitions: Vec<Step>,

    #[serde(default)]
    pub analyses_to_perform_on_results_page: Vec<Analysis>,
}

impl BannerRun {
    /// Flatten a banner into a run, deriving its analysis list.
    pub fn from_banner(banner: &Banner) -> Self {
        Self {
            banner_id: banner.id.clone(),
            banner_name: banner.name.clone(),
            total_multis: banner.total_multis.clone(),
            units: banner.units.clone(),
            step_definitions: banner.steps.clone(),
            analyses_to_perform_on_results_page: banner.analyses(),
        }
    }

    /// Number of multis to chart, or `default` when unset or invalid.
    pub fn horizon(&self, default: u32) -> u32 {
        positive_int_or(self.total_multis.as_ref(), default)
    }

    /// Analyses to run, in display order.
    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses_to_perform_on_results_page
    }
}

/// Every banner handed from the editor to the results view.
///
/// # Examples
///
/// ```rust
/// use sugostat::{Banner, CalculationSetup, Unit};
///
/// let banners = vec![
///     Banner::new("b1", "Fest", 30).with_unit(Unit::new("u1", "Alpha", 0.5)),
///     Banner::new("b2", "Empty", 30),
/// ];
/// let setup = CalculationSetup::from_banners(&banners);
/// assert_eq!(setup.all_banner_data.len(), 1);
///
/// let json = setup.to_json().unwrap();
/// assert!(json.contains("allBannerData"));
/// assert_eq!(CalculationSetup::from_json(&json).unwrap(), setup);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSetup {
    #[serde(default)]
    pub all_banner_data: Vec<BannerRun>,
}

impl CalculationSetup {
    /// Build the payload, dropping banners with nothing to analyse.
    pub fn from_banners(banners: &[Banner]) -> Self {
        let all_banner_data = banners
            .iter()
            .map(BannerRun::from_banner)
            .filter(|run| {
                let keep = !run.analyses_to_perform_on_results_page.is_empty();
                if !keep {
                    debug!("Banner '{}' has no analyses; leaving it out", run.banner_name);
                }
                keep
            })
            .collect();
        Self { all_banner_data }
    }

    /// Whether no banner has anything to analyse.
    pub fn is_empty(&self) -> bool {
        self.all_banner_data.is_empty()
    }

    /// Read the payload stored by the editor.
    pub fn from_json(json: &str) -> Result<Self, BannerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the payload as compact JSON.
    pub fn to_json(&self) -> Result<String, BannerError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisTarget, Constituent};

    #[test]
    fn test_from_banner_copies_fields() {
        let banner = Banner::new("b1", "Fest", 12)
            .with_step(Step::new("s1", [1], 25))
            .with_unit(Unit::new("u1", "Alpha", 0.5))
            .with_group(Analysis::custom_group("Pair", vec![Constituent::new("u1", 2)]));

        let run = BannerRun::from_banner(&banner);
        assert_eq!(run.banner_id, banner.id);
        assert_eq!(run.banner_name, "Fest");
        assert_eq!(run.horizon(30), 12);
        assert_eq!(run.step_definitions.len(), 1);
        assert_eq!(run.analyses().len(), 2);
        assert!(matches!(
            run.analyses()[1].target,
            AnalysisTarget::CustomGroup { .. }
        ));
    }

    #[test]
    fn test_reads_results_page_payload() {
        let json = r#"{"allBannerData": [{
            "bannerId": "banner_1",
            "bannerName": "Fest",
            "totalMultis": "15",
            "units": [
                {"id": "u1", "name": "Alpha", "universalBaseRate": "0.500", "stepOverrides": []}
            ],
            "stepDefinitions": [{"id": "s1", "appliesToMultis": [1], "gemCost": 25}],
            "analysesToPerformOnResultsPage": [
                {"bannerName": "Fest", "name": "Alpha", "type": "single_unit", "unitId": "u1"}
            ]
        }]}"#;

        let setup = CalculationSetup::from_json(json).unwrap();
        let run = &setup.all_banner_data[0];
        assert_eq!(run.horizon(30), 15);
        assert_eq!(run.analyses()[0].name, "Alpha");
        assert_eq!(
            run.analyses()[0].target,
            AnalysisTarget::SingleUnit {
                unit_id: "u1".into()
            }
        );
    }

    #[test]
    fn test_empty_setup() {
        let setup = CalculationSetup::from_banners(&[]);
        assert!(setup.is_empty());
    }
}
