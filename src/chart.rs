//! Chart-facing output.
//!
//! Turns analysis results into `{x, y}` series for the selected metric,
//! with the line color, an expected-cost label and the axis bounds the
//! chart should use. How the chart is drawn is up to the renderer.

use crate::calculator::{AnalysisResult, Report};
use crate::series::MultiRecord;
use serde::{Deserialize, Serialize};

/// Which per-multi value to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateMetric {
    /// Equivalent constant per-pull rate.
    NormalizedRate,
    /// Chance of having the target by this multi.
    #[serde(rename = "probPullAtLeastOne")]
    CumulativePullChance,
    /// Chance of the target from this multi alone.
    #[serde(rename = "probSuccessOnThisMultiOnly")]
    SuccessThisMulti,
}

impl RateMetric {
    /// Y-axis title.
    pub fn axis_label(self) -> &'static str {
        match self {
            RateMetric::NormalizedRate => "Normalized Rate (%)",
            RateMetric::CumulativePullChance => "Cumulative Pull Chance (%)",
            RateMetric::SuccessThisMulti => "Success Chance This Multi (%)",
        }
    }

    /// Value of this metric for one record, in percent.
    pub fn value(self, record: &MultiRecord) -> f64 {
        match self {
            RateMetric::NormalizedRate => record.normalized_rate,
            RateMetric::CumulativePullChance => record.prob_pull_at_least_one * 100.0,
            RateMetric::SuccessThisMulti => record.prob_success_on_this_multi_only,
        }
    }
}

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: u32,
    pub y: f64,
}

/// One line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
    pub expected_value_label: String,
}

/// Expected gem cost for display: one decimal, or `Effectively Never`.
///
/// # Examples
///
/// ```rust
/// use sugostat::format_expected_value;
///
/// assert_eq!(format_expected_value(1234.56), "1234.6");
/// assert_eq!(format_expected_value(f64::INFINITY), "Effectively Never");
/// ```
pub fn format_expected_value(gems: f64) -> String {
    if gems.is_finite() {
        format!("{:.1}", gems)
    } else {
        "Effectively Never".to_string()
    }
}

/// Build the chart line for one result.
pub fn chart_series(result: &AnalysisResult, metric: RateMetric) -> ChartSeries {
    ChartSeries {
        label: result.full_name.clone(),
        color: result.color.clone(),
        points: result
            .series
            .records
            .iter()
            .map(|record| ChartPoint {
                x: record.multi,
                y: metric.value(record),
            })
            .collect(),
        expected_value_label: format_expected_value(result.series.expected_value_gems),
    }
}

/// Upper bound of the y-axis, in percent, for the given results.
///
/// Cumulative chance always uses 100. Rate metrics zoom in on the largest
/// value that is neither ~0 nor ~100, with some headroom.
pub fn y_axis_max<'a>(
    metric: RateMetric,
    results: impl IntoIterator<Item = &'a AnalysisResult>,
) -> f64 {
    if metric == RateMetric::CumulativePullChance {
        return 100.0;
    }

    let mut largest: Option<f64> = None;
    let mut has_hundred = false;
    for record in results.into_iter().flat_map(|r| &r.series.records) {
        let value = metric.value(record);
        if (value - 100.0).abs() < 0.001 {
            has_hundred = true;
        } else if value > 0.001 {
            largest = Some(largest.map_or(value, |m: f64| m.max(value)));
        }
    }

    match largest {
        Some(max) => {
            let mut padding = (0.15 * max).max(0.5);
            if max < 2.0 {
                padding = padding.max(0.2);
            }
            let mut bound = (max + padding).ceil().min(100.0);
            if max < 1.0 {
                bound = bound.max(1.0);
            }
            bound
        }
        None if has_hundred => 100.0,
        None => 1.0,
    }
}

/// Every line of a report for one metric, in result order.
pub fn report_series(report: &Report, metric: RateMetric) -> Vec<ChartSeries> {
    report
        .results
        .iter()
        .map(|result| chart_series(result, metric))
        .collect()
}
