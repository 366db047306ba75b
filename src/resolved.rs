//! Resolved per-multi rates.
//!
//! A `ResolvedRates` is what the resolver hands to the series and detailed
//! calculators for one multi index: the two draw probabilities and the gem
//! cost in effect at that index.

use crate::numeric::{multi_miss_probability, STANDARD_MULTI_GEM_COST};
use serde::{Deserialize, Serialize};

/// Rates and cost in effect for one multi.
///
/// # Examples
///
/// ```rust
/// use sugostat::ResolvedRates;
///
/// let rates = ResolvedRates::universal(0.005);
/// assert_eq!(rates.gem_cost, 50);
/// assert!(rates.universal);
/// assert!((rates.hit_probability() - 0.0536).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRates {
    /// Success probability of each of the ten base draws.
    pub base_rate: f64,

    /// Success probability of the final poster draw.
    pub final_poster_rate: f64,

    /// Gems charged for this multi.
    pub gem_cost: u32,

    /// True when no step covered the multi (or the universal phase was requested).
    pub universal: bool,
}

impl ResolvedRates {
    /// Zero rates at standard cost, used for unknown units.
    pub fn none(universal: bool) -> Self {
        Self {
            base_rate: 0.0,
            final_poster_rate: 0.0,
            gem_cost: STANDARD_MULTI_GEM_COST,
            universal,
        }
    }

    /// A single universal rate for both draws, at standard cost.
    pub fn universal(rate: f64) -> Self {
        Self {
            base_rate: rate,
            final_poster_rate: rate,
            gem_cost: STANDARD_MULTI_GEM_COST,
            universal: true,
        }
    }

    /// Probability that this multi yields nothing.
    pub fn miss_probability(&self) -> f64 {
        multi_miss_probability(self.base_rate, self.final_poster_rate)
    }

    /// Probability that this multi yields the target at least once,
    /// ignoring earlier multis.
    pub fn hit_probability(&self) -> f64 {
        1.0 - self.miss_probability()
    }

    /// Cap both rates at 1.0.
    pub fn capped(self) -> Self {
        Self {
            base_rate: self.base_rate.min(1.0),
            final_poster_rate: self.final_poster_rate.min(1.0),
            ..self
        }
    }
}
