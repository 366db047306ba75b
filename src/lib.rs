//! # sugostat - Gacha Pull-Rate Statistics
//!
//! Computes, for step-up gacha banners:
//! - the **cumulative chance** of pulling a unit (or a weighted group of units)
//!   by each multi-pull,
//! - a **normalized rate**: the constant per-pull rate at the standard
//!   11-pull, 50-gem multi that would give the same cumulative chance,
//! - the **expected gem cost** to get the target,
//! - a **detailed table** with the expected remaining cost from any multi on.
//!
//! ## Core Concepts
//!
//! ### Rate Pipeline
//!
//! ```text
//! [Banner] → [RateResolver] → [compute_series / compute_detailed_table] → [chart / export]
//! ```
//!
//! 1. A **Banner** defines steps (which multis they cover and their gem
//!    cost) and units (a universal base rate plus per-step overrides).
//! 2. The **RateResolver** answers "what are the rates and cost of multi `k`
//!    for this target?", summing and capping rates for groups.
//! 3. The **series** and **detailed** calculators run the survival
//!    recurrence over the banner's horizon.
//!
//! Numbers arrive from a form editor, so they are lenient: `"0.5"`, `0.5`
//! and `"0.5%"` all mean half a percent, and anything unparseable falls back
//! to a documented default instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use sugostat::*;
//!
//! let banner = Banner::new("b1", "Fest", 10)
//!     .with_step(Step::new("s1", [1], 25))
//!     .with_unit(Unit::new("u1", "Alpha", 0.5).with_override("s1", 1.0, 5.0));
//!
//! let resolver = RateResolver::for_banner(&banner);
//! let target = AnalysisTarget::SingleUnit { unit_id: "u1".into() };
//! let series = compute_series(&target, &resolver, banner.horizon(30));
//!
//! assert_eq!(series.records.len(), 10);
//! assert!(series.records.windows(2).all(|w| {
//!     w[1].prob_pull_at_least_one >= w[0].prob_pull_at_least_one
//! }));
//! assert!(series.expected_value_gems.is_finite());
//! ```
//!
//! ## Modules
//!
//! - [`id`] - Banner, step, unit and analysis identifiers
//! - [`numeric`] - Lenient number parsing and shared constants
//! - [`model`] - Banner configuration
//! - [`resolver`] - Per-multi rate resolution
//! - [`resolved`] - Resolved rates of one multi
//! - [`series`] - Cumulative chance and expected cost
//! - [`detailed`] - Per-multi breakdown with conditional cost
//! - [`setup`] - Calculation hand-off payload
//! - [`calculator`] - Runs every analysis and builds a report
//! - [`chart`] - Chart series and axis bounds
//! - [`color`] - Stable chart colors
//! - [`export`] - CSV layouts
//! - [`config`] - Calculation settings
//! - [`error`] - Error types

pub mod calculator;
pub mod chart;
pub mod color;
pub mod config;
pub mod detailed;
pub mod error;
pub mod export;
pub mod id;
pub mod model;
pub mod numeric;
pub mod resolved;
pub mod resolver;
pub mod series;
pub mod setup;

// Re-export main types for convenience
pub use calculator::{AnalysisResult, Calculator, DetailedResult, Report};
pub use config::CalcConfig;
pub use error::BannerError;
pub use id::{AnalysisId, BannerId, StepId, UnitId};
pub use model::{Analysis, AnalysisTarget, Banner, Constituent, Step, StepOverride, Unit};
pub use numeric::LooseNumber;
pub use resolved::ResolvedRates;
pub use resolver::{resolve_unit, Phase, RateResolver};
pub use setup::{BannerRun, CalculationSetup};

// Re-export calculators
pub use detailed::{compute_detailed_table, ConditionalCost, DetailedRow, DetailedTable};
pub use series::{compute_series, MultiRecord, SeriesResult};

// Re-export output helpers
pub use chart::{
    chart_series, format_expected_value, report_series, y_axis_max, ChartPoint, ChartSeries,
    RateMetric,
};
pub use color::ColorAssigner;
pub use export::{detailed_csv, graph_csv};
