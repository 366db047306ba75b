//! Detailed per-multi breakdown.
//!
//! Runs the same recurrence as [`compute_series`](crate::series::compute_series)
//! but keeps the full history, then walks it backwards to compute, for every
//! multi `k`, the expected additional spend given the target was not pulled
//! before `k`.

use crate::model::AnalysisTarget;
use crate::numeric::{MASS_EPSILON, PROBABILITY_EPSILON};
use crate::resolver::{Phase, RateResolver};
use crate::series::advance_survival;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected additional gems from a multi onward, given no success before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "gems", rename_all = "snake_case")]
pub enum ConditionalCost {
    /// The target was effectively guaranteed before this multi; nothing more to spend.
    Settled,
    /// Expected additional gems.
    Gems(f64),
    /// No chance of success between this multi and the end of the table.
    NeverWithinHorizon,
    /// A probability sat exactly on the epsilon, so no other case applied.
    Unavailable,
}

impl fmt::Display for ConditionalCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalCost::Settled => write!(f, "0.0"),
            ConditionalCost::Gems(gems) => write!(f, "{:.1}", gems),
            ConditionalCost::NeverWithinHorizon => {
                write!(f, "Effectively Never (within CSV limit)")
            }
            ConditionalCost::Unavailable => write!(f, "N/A"),
        }
    }
}

/// One multi of the detailed table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRow {
    pub multi: u32,

    /// Gems spent through this multi.
    pub cumulative_gems_spent: u64,

    /// Chance the target is still missing after this multi.
    pub cumulative_prob_not_pull: f64,

    /// Chance the first success happens exactly at this multi.
    pub prob_first_success_this_multi: f64,

    pub conditional_expected_cost: ConditionalCost,
}

/// Detailed breakdown of one analysis target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedTable {
    pub rows: Vec<DetailedRow>,
}

impl DetailedTable {
    /// Row for a 1-based multi index.
    pub fn row(&self, multi: u32) -> Option<&DetailedRow> {
        multi.checked_sub(1).and_then(|i| self.rows.get(i as usize))
    }
}

/// Expected additional spend from a multi, given no success before it.
///
/// Both probabilities are compared strictly against the epsilon, so a value
/// sitting exactly on it falls through every branch to `Unavailable`.
fn conditional_cost(
    survival_before: f64,
    gems_before: u64,
    weighted_from: f64,
    probability_from: f64,
) -> ConditionalCost {
    if survival_before < PROBABILITY_EPSILON {
        ConditionalCost::Settled
    } else if probability_from < PROBABILITY_EPSILON && survival_before > PROBABILITY_EPSILON {
        ConditionalCost::NeverWithinHorizon
    } else if probability_from > PROBABILITY_EPSILON {
        ConditionalCost::Gems(weighted_from / survival_before - gems_before as f64)
    } else {
        ConditionalCost::Unavailable
    }
}

/// Compute the detailed table for `target` over `horizon` multis.
///
/// # Examples
///
/// ```rust
/// use sugostat::*;
///
/// let units = vec![Unit::new("u1", "Dragon Knight", 1.0)];
/// let resolver = RateResolver::new(&units, &[]);
/// let target = AnalysisTarget::SingleUnit { unit_id: "u1".into() };
///
/// let table = compute_detailed_table(&target, &resolver, 200);
/// let first = table.row(1).unwrap();
/// assert_eq!(first.cumulative_gems_spent, 50);
/// assert!(matches!(first.conditional_expected_cost, ConditionalCost::Gems(_)));
/// ```
pub fn compute_detailed_table(
    target: &AnalysisTarget,
    resolver: &RateResolver<'_>,
    horizon: u32,
) -> DetailedTable {
    let len = horizon as usize;
    let mut gems_through = Vec::with_capacity(len);
    let mut survival_through = Vec::with_capacity(len);
    let mut first_success_at = Vec::with_capacity(len);

    let mut gems = 0_u64;
    let mut survival = 1.0_f64;
    for multi in 1..=horizon {
        let rates = resolver.resolve_target(target, multi, Phase::Stepped);
        gems += u64::from(rates.gem_cost);

        let miss = rates.miss_probability();
        first_success_at.push(survival * (1.0 - miss));
        survival = advance_survival(survival, miss, multi);

        gems_through.push(gems);
        survival_through.push(survival);
    }

    // Suffix sums over j >= k of gems[j] * p_first[j] and p_first[j].
    let mut weighted_from = vec![0.0_f64; len];
    let mut probability_from = vec![0.0_f64; len];
    let mut weighted_tail = 0.0_f64;
    let mut probability_tail = 0.0_f64;
    for j in (0..len).rev() {
        let p = first_success_at[j];
        if p > MASS_EPSILON {
            weighted_tail += gems_through[j] as f64 * p;
            probability_tail += p;
        }
        weighted_from[j] = weighted_tail;
        probability_from[j] = probability_tail;
    }

    let rows = (0..len)
        .map(|i| {
            let (survival_before, gems_before) = match i {
                0 => (1.0, 0_u64),
                _ => (survival_through[i - 1], gems_through[i - 1]),
            };

            let conditional_expected_cost = conditional_cost(
                survival_before,
                gems_before,
                weighted_from[i],
                probability_from[i],
            );

            DetailedRow {
                multi: i as u32 + 1,
                cumulative_gems_spent: gems_through[i],
                cumulative_prob_not_pull: survival_through[i],
                prob_first_success_this_multi: first_success_at[i],
                conditional_expected_cost,
            }
        })
        .collect();

    DetailedTable { rows }
}
