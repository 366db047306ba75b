//! CSV example: banners from JSON to both CSV layouts
//!
//! This example demonstrates:
//! - Loading banners exported by the editor
//! - The calculation hand-off payload
//! - Writing the detailed and graph CSV files

use std::fs;
use sugostat::*;

const BANNERS: &str = r#"[
  {
    "id": "banner_1",
    "name": "Winter Sugofest",
    "totalMultis": "15",
    "steps": [
      {"id": "step_1", "appliesToMultis": [1], "gemCost": "25"},
      {"id": "step_2", "appliesToMultis": [2, 3], "gemCost": "50"}
    ],
    "units": [
      {"id": "unit_1", "name": "Frost Archer", "universalBaseRate": "0.5",
       "stepOverrides": [
         {"globalStepDefId": "step_2", "baseRate10Pulls": "1", "finalPosterRate": "3"}
       ]},
      {"id": "unit_2", "name": "Snow Sage", "universalBaseRate": "0.25", "stepOverrides": []}
    ],
    "customAnalyses": [
      {"name": "Archer x2 or Sage", "type": "custom_group",
       "constituents": [
         {"unitId": "unit_1", "multiplier": 2},
         {"unitId": "unit_2", "multiplier": 1}
       ]}
    ]
  }
]"#;

fn main() -> Result<(), BannerError> {
    env_logger::init();

    let banners = Banner::list_from_json(BANNERS)?;
    for banner in &banners {
        if let Err(err) = banner.validate() {
            eprintln!("{}: {}", banner.name, err);
        }
    }

    // The results view only ever sees this payload.
    let payload = CalculationSetup::from_banners(&banners).to_json()?;
    let setup = CalculationSetup::from_json(&payload)?;

    let config = CalcConfig {
        include_success_row: true,
        ..CalcConfig::default()
    };
    let mut calculator = Calculator::new(config.clone());
    let report = calculator.run(&setup);

    let detailed = detailed_csv(&calculator.detailed(&setup))?;
    let graph = graph_csv(&report, config.include_success_row)?;

    fs::write("sugofest_detailed_analysis.csv", &detailed)?;
    fs::write("sugofest_graph_data.csv", &graph)?;

    println!(
        "Wrote {} analyses ({} detailed lines, {} graph lines)",
        report.results.len(),
        detailed.lines().count(),
        graph.lines().count()
    );

    Ok(())
}
