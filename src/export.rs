//! CSV export.
//!
//! Two layouts, both with one block of rows per analysis and a blank line
//! between blocks:
//!
//! - **detailed**: the per-multi breakdown from
//!   [`Calculator::detailed`](crate::Calculator::detailed), with an extra
//!   blank line after each banner.
//! - **graph**: the charted values from a [`Report`], padded to the report's
//!   width so every block lines up under the first block's multi labels.
//!
//! Cells containing quotes, commas or newlines are quoted with inner quotes
//! doubled.

use crate::calculator::{DetailedResult, Report};
use crate::error::BannerError;
use crate::series::MultiRecord;
use std::collections::HashMap;

/// Labels of the graph CSV rows, in order.
pub const GRAPH_ROW_LABELS: [&str; 3] = [
    "Normalized Rate (%)",
    "Cumulative Pull Chance (%)",
    "Success Chance This Multi (%)",
];

fn block_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

/// Serialize a block of rows, without the trailing blank line.
fn write_block(rows: &[Vec<String>]) -> Result<String, BannerError> {
    let mut writer = block_writer();
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| BannerError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

fn multi_labels(label: &str, count: u32) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain((1..=count).map(|i| format!("Multi {}", i)))
        .collect()
}

fn labelled<T>(label: &str, cells: &[T], cell: impl Fn(&T) -> String) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain(cells.iter().map(cell))
        .collect()
}

/// Rows of one analysis in the detailed layout.
fn detailed_rows(result: &DetailedResult) -> Vec<Vec<String>> {
    let rows = &result.table.rows;
    vec![
        multi_labels(&result.full_name, rows.len() as u32),
        labelled("Cumulative Gems Spent", rows, |r| r.cumulative_gems_spent.to_string()),
        labelled("Cumulative P(No Pull)", rows, |r| {
            format!("{:.7}", r.cumulative_prob_not_pull)
        }),
        labelled("P(1st Success this Multi)", rows, |r| {
            format!("{:.7}", r.prob_first_success_this_multi)
        }),
        labelled("Cond. Avg. Cost from this Multi", rows, |r| {
            r.conditional_expected_cost.to_string()
        }),
    ]
}

/// Render the detailed CSV from per-banner detailed results.
///
/// # Examples
///
/// ```rust
/// use sugostat::*;
///
/// let banners = vec![Banner::new("b1", "Fest", 10).with_unit(Unit::new("u1", "Alpha", 1.0))];
/// let setup = CalculationSetup::from_banners(&banners);
/// let calculator = Calculator::new(CalcConfig { csv_horizon: 3, ..CalcConfig::default() });
///
/// let csv = detailed_csv(&calculator.detailed(&setup)).unwrap();
/// let first = csv.lines().next().unwrap();
/// assert_eq!(first, "Fest - Alpha,Multi 1,Multi 2,Multi 3");
/// ```
pub fn detailed_csv(banners: &[Vec<DetailedResult>]) -> Result<String, BannerError> {
    let mut out = String::new();
    for analyses in banners {
        for result in analyses {
            out.push_str(&write_block(&detailed_rows(result))?);
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

fn normalized_rate(record: &MultiRecord) -> f64 {
    record.normalized_rate
}

fn cumulative_percent(record: &MultiRecord) -> f64 {
    record.prob_pull_at_least_one * 100.0
}

fn success_this_multi(record: &MultiRecord) -> f64 {
    record.prob_success_on_this_multi_only
}

fn percent_cell(slot: Option<&MultiRecord>, value: fn(&MultiRecord) -> f64) -> String {
    slot.map(|record| format!("{:.3}", value(record)))
        .unwrap_or_default()
}

/// Render the graph CSV from a report.
///
/// Every block spans `report.max_multis` columns; multis beyond an
/// analysis's own horizon are left empty.
pub fn graph_csv(report: &Report, include_success_row: bool) -> Result<String, BannerError> {
    let width = report.max_multis;
    let mut out = String::new();

    for (index, result) in report.results.iter().enumerate() {
        let header = if index == 0 {
            multi_labels(&result.full_name, width)
        } else {
            std::iter::once(result.full_name.clone())
                .chain((0..width).map(|_| String::new()))
                .collect()
        };

        let by_multi: HashMap<u32, &MultiRecord> = result
            .series
            .records
            .iter()
            .map(|record| (record.multi, record))
            .collect();
        // Multis past this analysis's horizon stay empty.
        let slots: Vec<Option<&MultiRecord>> =
            (1..=width).map(|multi| by_multi.get(&multi).copied()).collect();

        let mut rows = vec![
            header,
            labelled(GRAPH_ROW_LABELS[0], &slots, |slot| percent_cell(*slot, normalized_rate)),
            labelled(GRAPH_ROW_LABELS[1], &slots, |slot| percent_cell(*slot, cumulative_percent)),
        ];
        if include_success_row {
            rows.push(labelled(GRAPH_ROW_LABELS[2], &slots, |slot| {
                percent_cell(*slot, success_this_multi)
            }));
        }

        out.push_str(&write_block(&rows)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::AnalysisResult;
    use crate::detailed::{ConditionalCost, DetailedRow, DetailedTable};
    use crate::series::SeriesResult;

    fn detailed(name: &str) -> DetailedResult {
        DetailedResult {
            full_name: name.to_string(),
            table: DetailedTable {
                rows: vec![
                    DetailedRow {
                        multi: 1,
                        cumulative_gems_spent: 50,
                        cumulative_prob_not_pull: 0.9,
                        prob_first_success_this_multi: 0.1,
                        conditional_expected_cost: ConditionalCost::Gems(123.456),
                    },
                    DetailedRow {
                        multi: 2,
                        cumulative_gems_spent: 100,
                        cumulative_prob_not_pull: 0.9,
                        prob_first_success_this_multi: 0.0,
                        conditional_expected_cost: ConditionalCost::NeverWithinHorizon,
                    },
                ],
            },
        }
    }

    fn analysis(name: &str, multis: u32) -> AnalysisResult {
        AnalysisResult {
            full_name: name.to_string(),
            banner_name: "Fest".into(),
            analysis_name: name.to_string(),
            color: "#000".into(),
            horizon: multis,
            series: SeriesResult {
                records: (1..=multis)
                    .map(|multi| MultiRecord {
                        multi,
                        prob_pull_at_least_one: 0.5,
                        normalized_rate: 1.25,
                        prob_success_on_this_multi_only: 9.5,
                    })
                    .collect(),
                expected_value_gems: 100.0,
            },
        }
    }

    #[test]
    fn test_detailed_layout() {
        let csv = detailed_csv(&[vec![detailed("Fest - Alpha")]]).unwrap();
        let expected = "Fest - Alpha,Multi 1,Multi 2\n\
                        Cumulative Gems Spent,50,100\n\
                        Cumulative P(No Pull),0.9000000,0.9000000\n\
                        P(1st Success this Multi),0.1000000,0.0000000\n\
                        Cond. Avg. Cost from this Multi,123.5,\
                        Effectively Never (within CSV limit)\n\
                        \n\
                        \n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_detailed_blank_lines_between_banners() {
        let csv = detailed_csv(&[
            vec![detailed("A - x"), detailed("A - y")],
            vec![detailed("B - z")],
        ])
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "A - x,Multi 1,Multi 2");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "A - y,Multi 1,Multi 2");
        assert_eq!(lines[11], "");
        assert_eq!(lines[12], "");
        assert_eq!(lines[13], "B - z,Multi 1,Multi 2");
        assert!(csv.ends_with("\n\n\n"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let csv = detailed_csv(&[vec![detailed("Fest, \"Deluxe\" - Alpha")]]).unwrap();
        assert!(csv.starts_with("\"Fest, \"\"Deluxe\"\" - Alpha\",Multi 1"));
    }

    #[test]
    fn test_graph_layout_pads_short_series() {
        let report = Report {
            results: vec![analysis("Fest - Alpha", 3), analysis("Fest - Beta", 2)],
            max_multis: 3,
        };
        let csv = graph_csv(&report, false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Fest - Alpha,Multi 1,Multi 2,Multi 3");
        assert_eq!(lines[1], "Normalized Rate (%),1.250,1.250,1.250");
        assert_eq!(lines[2], "Cumulative Pull Chance (%),50.000,50.000,50.000");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Fest - Beta,,,");
        assert_eq!(lines[5], "Normalized Rate (%),1.250,1.250,");
        assert_eq!(lines[6], "Cumulative Pull Chance (%),50.000,50.000,");
        assert_eq!(lines[7], "");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_graph_success_row() {
        let report = Report {
            results: vec![analysis("Fest - Alpha", 1)],
            max_multis: 1,
        };
        let csv = graph_csv(&report, true).unwrap();
        assert!(csv.contains("\nSuccess Chance This Multi (%),9.500\n"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(detailed_csv(&[]).unwrap(), "");
        let report = Report {
            results: Vec::new(),
            max_multis: 30,
        };
        assert_eq!(graph_csv(&report, false).unwrap(), "");
    }
}
