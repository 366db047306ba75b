//! Rate resolver module.
//!
//! Provides the `RateResolver` type, which decides the rates and gem cost
//! in effect for a unit (or a weighted group of units) at a given multi
//! index. Both the series calculator and the detailed table generator go
//! through it for every multi.

use crate::id::UnitId;
use crate::model::{AnalysisTarget, Banner, Step, Unit};
use crate::numeric::STANDARD_MULTI_GEM_COST;
use crate::resolved::ResolvedRates;
use std::collections::HashMap;

/// Which rate regime to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Use the first step covering the multi, if any.
    Stepped,
    /// Ignore steps entirely and use universal rates at standard cost.
    Universal,
}

/// Resolve the rates in effect for `unit` at `multi`.
///
/// A missing unit resolves to zero rates at the standard cost. In the
/// stepped phase the first step whose `appliesToMultis` contains `multi`
/// sets the gem cost, and the unit's override for that step (if any)
/// replaces its universal rate. Multis covered by no step are universal.
///
/// # Examples
///
/// ```rust
/// use sugostat::{resolve_unit, Phase, Step, Unit};
///
/// let steps = vec![Step::new("step_1", [1], 25)];
/// let unit = Unit::new("unit_1", "Dragon Knight", 0.5).with_override("step_1", 1.0, 3.0);
///
/// let first = resolve_unit(Some(&unit), 1, &steps, Phase::Stepped);
/// assert_eq!(first.base_rate, 0.01);
/// assert_eq!(first.final_poster_rate, 0.03);
/// assert_eq!(first.gem_cost, 25);
///
/// let second = resolve_unit(Some(&unit), 2, &steps, Phase::Stepped);
/// assert!(second.universal);
/// assert_eq!(second.base_rate, 0.005);
/// assert_eq!(second.gem_cost, 50);
/// ```
pub fn resolve_unit(
    unit: Option<&Unit>,
    multi: u32,
    steps: &[Step],
    phase: Phase,
) -> ResolvedRates {
    let Some(unit) = unit else {
        return ResolvedRates::none(phase == Phase::Universal);
    };

    let universal_rate = unit.universal_rate();
    if phase == Phase::Universal {
        return ResolvedRates::universal(universal_rate);
    }

    // Overlapping steps are a configuration mistake; the first listed wins.
    match steps.iter().find(|step| step.applies_to(multi)) {
        Some(step) => {
            let (base_rate, final_poster_rate) = match unit.override_for(&step.id) {
                Some(step_override) => (
                    step_override.base_rate(),
                    step_override.final_poster_rate(),
                ),
                None => (universal_rate, universal_rate),
            };
            ResolvedRates {
                base_rate,
                final_poster_rate,
                gem_cost: step.gem_cost(),
                universal: false,
            }
        }
        None => ResolvedRates::universal(universal_rate),
    }
}

/// Resolves rates for analysis targets against one banner's units and steps.
///
/// Unit lookup is indexed once at construction; when several units share
/// an id the first one listed is used.
///
/// # Examples
///
/// ```rust
/// use sugostat::*;
///
/// let banner = Banner::new("banner_1", "Fest", 10)
///     .with_unit(Unit::new("a", "A", 40.0))
///     .with_unit(Unit::new("b", "B", 80.0));
/// let resolver = RateResolver::for_banner(&banner);
///
/// let group = AnalysisTarget::CustomGroup {
///     constituents: vec![Constituent::new("a", 1), Constituent::new("b", 1)],
/// };
/// let rates = resolver.resolve_target(&group, 1, Phase::Stepped);
/// assert_eq!(rates.base_rate, 1.0); // 0.4 + 0.8, capped
/// ```
pub struct RateResolver<'a> {
    units: HashMap<&'a UnitId, &'a Unit>,
    steps: &'a [Step],
}

impl<'a> RateResolver<'a> {
    /// Create a resolver over the given units and steps.
    pub fn new(units: &'a [Unit], steps: &'a [Step]) -> Self {
        let mut index = HashMap::with_capacity(units.len());
        for unit in units {
            index.entry(&unit.id).or_insert(unit);
        }
        Self {
            units: index,
            steps,
        }
    }

    /// Create a resolver over a banner's units and steps.
    pub fn for_banner(banner: &'a Banner) -> Self {
        Self::new(&banner.units, &banner.steps)
    }

    /// Look up a unit by id.
    pub fn unit(&self, id: &UnitId) -> Option<&'a Unit> {
        self.units.get(id).copied()
    }

    /// Resolve the rates for one unit at `multi`.
    pub fn resolve(&self, unit_id: &UnitId, multi: u32, phase: Phase) -> ResolvedRates {
        resolve_unit(self.unit(unit_id), multi, self.steps, phase)
    }

    /// Resolve the effective rates of an analysis target at `multi`.
    ///
    /// For a custom group each constituent's rates are multiplied by its
    /// multiplier and summed; only the sums are capped at 1.0. Constituents
    /// without a unit are skipped, and the gem cost comes from the first
    /// constituent that has one. An empty group resolves to zero rates.
    pub fn resolve_target(
        &self,
        target: &AnalysisTarget,
        multi: u32,
        phase: Phase,
    ) -> ResolvedRates {
        match target {
            AnalysisTarget::SingleUnit { unit_id } => self.resolve(unit_id, multi, phase).capped(),
            AnalysisTarget::CustomGroup { constituents } => {
                let mut combined: Option<ResolvedRates> = None;

                for constituent in constituents {
                    let Some(unit_id) = &constituent.unit_id else {
                        continue;
                    };
                    let rates = self.resolve(unit_id, multi, phase);
                    let weight = f64::from(constituent.multiplier());

                    match combined.as_mut() {
                        Some(total) => {
                            total.base_rate += rates.base_rate * weight;
                            total.final_poster_rate += rates.final_poster_rate * weight;
                        }
                        None => {
                            combined = Some(ResolvedRates {
                                base_rate: rates.base_rate * weight,
                                final_poster_rate: rates.final_poster_rate * weight,
                                ..rates
                            });
                        }
                    }
                }

                combined
                    .unwrap_or(ResolvedRates {
                        base_rate: 0.0,
                        final_poster_rate: 0.0,
                        gem_cost: STANDARD_MULTI_GEM_COST,
                        universal: phase == Phase::Universal,
                    })
                    .capped()
            }
        }
    }

    /// Unit ids referenced by `target` that this banner does not define.
    pub fn missing_units<'t>(&self, target: &'t AnalysisTarget) -> Vec<&'t UnitId> {
        target
            .unit_ids()
            .into_iter()
            .filter(|id| !self.units.contains_key(id))
            .collect()
    }
}
