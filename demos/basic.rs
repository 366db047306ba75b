//! Basic example: one unit on a plain banner
//!
//! This example demonstrates:
//! - Building a banner in code
//! - Computing the per-multi series for a single unit
//! - Reading the expected gem cost

use sugostat::*;

fn main() -> Result<(), BannerError> {
    env_logger::init();

    // A banner with no steps: every multi costs 50 gems at universal rates
    let banner = Banner::new("banner_1", "Summer Sugofest", 20)
        .with_unit(Unit::new("unit_1", "Beach Paladin", 0.75));
    banner.validate()?;

    let resolver = RateResolver::for_banner(&banner);
    let target = AnalysisTarget::SingleUnit {
        unit_id: "unit_1".into(),
    };
    let series = compute_series(&target, &resolver, banner.horizon(30));

    let analysis = Analysis::single_unit("Beach Paladin", "unit_1");
    println!("=== {} ===", analysis.full_name(&banner.name));
    println!("{:>5}  {:>12}  {:>12}", "Multi", "Cumulative", "Normalized");
    for record in &series.records {
        println!(
            "{:>5}  {:>11.3}%  {:>11.3}%",
            record.multi,
            record.prob_pull_at_least_one * 100.0,
            record.normalized_rate
        );
    }

    println!(
        "\nExpected cost: {} gems",
        format_expected_value(series.expected_value_gems)
    );

    Ok(())
}
