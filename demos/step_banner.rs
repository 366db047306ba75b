//! Step-up example: per-step costs and rate overrides
//!
//! This example demonstrates:
//! - Steps with discounted and boosted multis
//! - Unit overrides on specific steps
//! - A weighted custom group
//! - Running every analysis through the `Calculator`

use sugostat::*;

fn main() -> Result<(), BannerError> {
    env_logger::init();

    let banner = Banner::new("banner_1", "Anniversary Sugofest", 30)
        // Step 1: half-price first multi
        .with_step(Step::new("step_1", [1], 25))
        // Step 3: boosted featured rates
        .with_step(Step::new("step_3", [3], 50))
        // Step 5: guaranteed poster
        .with_step(Step::new("step_5", [5], 50))
        .with_unit(
            Unit::new("unit_1", "Dragon Knight", 0.5)
                .with_override("step_3", 1.0, 10.0)
                .with_override("step_5", 1.0, 100.0),
        )
        .with_unit(Unit::new("unit_2", "Sea Witch", 0.5).with_override("step_3", 1.0, 5.0))
        .with_group(Analysis::custom_group(
            "Either Featured",
            vec![Constituent::new("unit_1", 1), Constituent::new("unit_2", 1)],
        ));
    banner.validate()?;

    let setup = CalculationSetup::from_banners(std::slice::from_ref(&banner));
    let mut calculator = Calculator::new(CalcConfig::default());
    let report = calculator.run(&setup);

    for result in &report.results {
        println!("=== {} ({}) ===", result.full_name, result.color);
        for multi in [1, 3, 5, 10, 30] {
            if let Some(record) = result.series.record(multi) {
                println!(
                    "  Multi {:>2}: {:>7.3}% cumulative, {:>6.3}% this multi",
                    multi,
                    record.prob_pull_at_least_one * 100.0,
                    record.prob_success_on_this_multi_only
                );
            }
        }
        println!(
            "  Expected cost: {}\n",
            format_expected_value(result.series.expected_value_gems)
        );
    }

    let metric = RateMetric::NormalizedRate;
    println!(
        "{} axis: 0 to {}% over {} multis",
        metric.axis_label(),
        y_axis_max(metric, &report.results),
        report.max_multis
    );

    Ok(())
}
