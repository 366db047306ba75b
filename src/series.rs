//! Per-multi pull statistics.
//!
//! For each multi `k = 1..horizon` the series calculator tracks the chance
//! that the target has still not been pulled, the gems spent so far, and
//! the running expectation of total spend at the moment of first success.
//! Past the horizon, the expected value is completed with a universal-rate
//! continuation.

use crate::model::AnalysisTarget;
use crate::numeric::{
    GUARANTEED_THRESHOLD, MASS_EPSILON, PROBABILITY_EPSILON, PULLS_PER_STANDARD_MULTI,
    STANDARD_MULTI_GEM_COST,
};
use crate::resolver::{Phase, RateResolver};
use log::trace;
use serde::{Deserialize, Serialize};

/// Derived statistics for one multi index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiRecord {
    /// 1-based multi index.
    pub multi: u32,

    /// Chance (0..=1) the target has been pulled at least once by this multi.
    pub prob_pull_at_least_one: f64,

    /// Equivalent constant per-pull rate, in percent.
    pub normalized_rate: f64,

    /// Chance (percent) this multi alone yields the target.
    pub prob_success_on_this_multi_only: f64,
}

/// The per-multi series and expected gem cost for one analysis target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResult {
    pub records: Vec<MultiRecord>,

    /// Expected gems to obtain the target; `f64::INFINITY` when it is not
    /// expected to ever be obtained. Infinity is written as `null` in JSON.
    #[serde(with = "expected_gems")]
    pub expected_value_gems: f64,
}

/// JSON has no infinity; an unreachable target's cost travels as `null`.
mod expected_gems {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(gems: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let finite = if gems.is_finite() { Some(*gems) } else { None };
        finite.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

impl SeriesResult {
    /// Whether the expected cost is finite.
    pub fn is_reachable(&self) -> bool {
        self.expected_value_gems.is_finite()
    }

    /// Record for a 1-based multi index.
    pub fn record(&self, multi: u32) -> Option<&MultiRecord> {
        multi
            .checked_sub(1)
            .and_then(|i| self.records.get(i as usize))
    }
}

/// Step the survival probability forward by one multi.
///
/// Applies the guaranteed clamp (anything above 0.9999 cumulative chance
/// is treated as certain) and keeps the value inside `[0, 1]`.
pub(crate) fn advance_survival(survival: f64, miss_probability: f64, multi: u32) -> f64 {
    let mut next = survival * miss_probability;
    if 1.0 - next > GUARANTEED_THRESHOLD && next != 0.0 {
        trace!("Cumulative pull chance passed threshold at multi {}", multi);
        next = 0.0;
    }
    next.clamp(0.0, 1.0)
}

/// Constant per-pull rate that reproduces `survival` over the pulls that
/// `gems_spent` would buy at the standard price.
fn normalized_rate(survival: f64, gems_spent: f64) -> f64 {
    let pulls = gems_spent / f64::from(STANDARD_MULTI_GEM_COST) * PULLS_PER_STANDARD_MULTI;
    if pulls <= 0.0 {
        0.0
    } else if survival == 0.0 {
        1.0
    } else if survival == 1.0 {
        0.0
    } else {
        1.0 - survival.powf(1.0 / pulls)
    }
}

/// Compute the per-multi series for `target` over `horizon` multis.
///
/// # Examples
///
/// ```rust
/// use sugostat::*;
///
/// let banner = Banner::new("b", "Fest", 30)
///     .with_step(Step::new("s1", [1], 50))
///     .with_unit(Unit::new("u1", "Dragon Knight", 0.5).with_override("s1", 0.5, 3.0));
/// let resolver = RateResolver::for_banner(&banner);
/// let target = AnalysisTarget::SingleUnit { unit_id: "u1".into() };
///
/// let series = compute_series(&target, &resolver, 30);
/// assert_eq!(series.records.len(), 30);
/// assert!((series.records[0].prob_pull_at_least_one - 0.0773).abs() < 1e-3);
/// assert!(series.is_reachable());
/// ```
pub fn compute_series(
    target: &AnalysisTarget,
    resolver: &RateResolver<'_>,
    horizon: u32,
) -> SeriesResult {
    let mut records = Vec::with_capacity(horizon as usize);
    let mut survival = 1.0_f64;
    let mut gems_spent = 0.0_f64;
    let mut expected_value = 0.0_f64;

    for multi in 1..=horizon {
        let rates = resolver.resolve_target(target, multi, Phase::Stepped);
        gems_spent += f64::from(rates.gem_cost);

        let miss = rates.miss_probability();
        let hit = 1.0 - miss;
        let first_success_here = survival * hit;

        if survival > MASS_EPSILON {
            expected_value += gems_spent * first_success_here;
        }

        survival = advance_survival(survival, miss, multi);

        records.push(MultiRecord {
            multi,
            prob_pull_at_least_one: 1.0 - survival,
            normalized_rate: normalized_rate(survival, gems_spent) * 100.0,
            prob_success_on_this_multi_only: hit * 100.0,
        });
    }

    if survival > PROBABILITY_EPSILON {
        // Whatever is left gets pulled at universal rates, one standard multi at a time.
        let universal = resolver.resolve_target(target, 0, Phase::Universal);
        let hit = universal.hit_probability();
        if hit > PROBABILITY_EPSILON {
            let continuation = f64::from(STANDARD_MULTI_GEM_COST) / hit;
            expected_value += survival * (gems_spent + continuation);
        } else {
            expected_value = f64::INFINITY;
        }
    }

    let ever_pulled = 1.0 - survival;
    let expected_value_gems = if ever_pulled > PROBABILITY_EPSILON && expected_value > 0.0 {
        expected_value
    } else {
        f64::INFINITY
    };

    SeriesResult {
        records,
        expected_value_gems,
    }
}
