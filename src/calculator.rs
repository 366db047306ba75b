//! Calculation pass over every banner.
//!
//! The `Calculator` runs each analysis of each banner through the series
//! calculator, assigns it a chart color, and collects everything into a
//! [`Report`] that the chart and CSV exporters consume.

use crate::color::ColorAssigner;
use crate::config::CalcConfig;
use crate::detailed::{compute_detailed_table, DetailedTable};
use crate::model::Analysis;
use crate::resolver::RateResolver;
use crate::series::{compute_series, SeriesResult};
use crate::setup::{BannerRun, CalculationSetup};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The series of one analysis with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// `"<banner> - <analysis>"`.
    pub full_name: String,
    pub banner_name: String,
    pub analysis_name: String,
    pub color: String,
    /// Horizon the series was computed over.
    pub horizon: u32,
    pub series: SeriesResult,
}

/// The detailed table of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResult {
    pub full_name: String,
    pub table: DetailedTable,
}

/// Results of one calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub results: Vec<AnalysisResult>,

    /// Chart x-axis max and graph CSV width.
    pub max_multis: u32,
}

impl Report {
    /// Result by full analysis name.
    pub fn result(&self, full_name: &str) -> Option<&AnalysisResult> {
        self.results.iter().find(|r| r.full_name == full_name)
    }
}

/// Runs analyses with one configuration and one color assigner.
///
/// Colors are keyed by full analysis name and persist across passes, so
/// recalculating after an edit keeps every line the same color.
///
/// # Examples
///
/// ```rust
/// use sugostat::*;
///
/// let banners = vec![Banner::new("b1", "Fest", 10).with_unit(Unit::new("u1", "Alpha", 1.0))];
/// let setup = CalculationSetup::from_banners(&banners);
///
/// let mut calculator = Calculator::new(CalcConfig::default());
/// let report = calculator.run(&setup);
///
/// let alpha = report.result("Fest - Alpha").unwrap();
/// assert_eq!(alpha.series.records.len(), 10);
/// assert_eq!(report.max_multis, 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: CalcConfig,
    colors: ColorAssigner,
}

impl Calculator {
    /// Create a calculator with its own color assigner.
    pub fn new(config: CalcConfig) -> Self {
        Self {
            config,
            colors: ColorAssigner::new(),
        }
    }

    /// Create a calculator around an existing color assigner.
    ///
    /// Keys already assigned keep their colors; new ones continue the
    /// assigner's first-seen order.
    pub fn with_colors(config: CalcConfig, colors: ColorAssigner) -> Self {
        Self { config, colors }
    }

    /// Settings this calculator runs with.
    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    /// Compute the series of every analysis in the setup.
    pub fn run(&mut self, setup: &CalculationSetup) -> Report {
        let mut results = Vec::new();

        for run in &setup.all_banner_data {
            let horizon = run.horizon(self.config.default_horizon);
            let resolver = RateResolver::new(&run.units, &run.step_definitions);

            for analysis in run.analyses() {
                let result = self.analyse(run, analysis, &resolver, horizon);
                results.push(result);
            }
        }

        let max_multis = setup
            .all_banner_data
            .iter()
            .map(|run| run.horizon(0))
            .chain(std::iter::once(self.config.min_chart_multis))
            .max()
            .unwrap_or(self.config.min_chart_multis);

        Report {
            results,
            max_multis,
        }
    }

    /// Compute the detailed table of every analysis, banner by banner.
    ///
    /// Uses the configured CSV horizon rather than each banner's own.
    pub fn detailed(&self, setup: &CalculationSetup) -> Vec<Vec<DetailedResult>> {
        setup
            .all_banner_data
            .iter()
            .map(|run| {
                let resolver = RateResolver::new(&run.units, &run.step_definitions);
                run.analyses()
                    .iter()
                    .map(|analysis| DetailedResult {
                        full_name: analysis.full_name(&run.banner_name),
                        table: compute_detailed_table(
                            &analysis.target,
                            &resolver,
                            self.config.csv_horizon,
                        ),
                    })
                    .collect()
            })
            .collect()
    }

    fn analyse(
        &mut self,
        run: &BannerRun,
        analysis: &Analysis,
        resolver: &RateResolver<'_>,
        horizon: u32,
    ) -> AnalysisResult {
        let full_name = analysis.full_name(&run.banner_name);

        let missing = resolver.missing_units(&analysis.target);
        if !missing.is_empty() {
            warn!(
                "Analysis '{}' references unknown units {:?}; they count as zero rate",
                full_name,
                missing.iter().map(|id| id.as_str()).collect::<Vec<_>>()
            );
        }
        if analysis.target.unit_ids().is_empty() {
            warn!("Custom group '{}' has no units selected", full_name);
        }

        let series = compute_series(&analysis.target, resolver, horizon);
        debug!(
            "Computed '{}' over {} multis, expected cost {}",
            full_name, horizon, series.expected_value_gems
        );

        AnalysisResult {
            color: self.colors.color_for(&full_name).to_string(),
            banner_name: run.banner_name.clone(),
            analysis_name: analysis.name.clone(),
            horizon,
            series,
            full_name,
        }
    }
}
