use sugostat::*;

fn banners() -> Vec<Banner> {
    vec![
        Banner::new("b1", "Fest, \"Deluxe\"", 12)
            .with_step(Step::new("s1", [1], 25))
            .with_unit(Unit::new("u1", "Alpha", 0.5).with_override("s1", 1.0, 5.0))
            .with_unit(Unit::new("u2", "Beta", 0.0)),
        Banner::new("b2", "Second", 40).with_unit(Unit::new("u9", "Gamma", 1.0)),
    ]
}

fn cells(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let record = reader.records().next().unwrap().unwrap();
    record.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Detailed CSV
// ============================================================================

/// Detailed CSV block layout, quoting and blank-line separators.
#[test]
fn test_detailed_csv_blocks() {
    let setup = CalculationSetup::from_banners(&banners());
    let calculator = Calculator::new(CalcConfig {
        csv_horizon: 5,
        ..CalcConfig::default()
    });
    let csv = detailed_csv(&calculator.detailed(&setup)).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    // banner 1: two analyses of 5 rows + blank, then a banner blank
    assert_eq!(
        cells(lines[0]),
        vec!["Fest, \"Deluxe\" - Alpha", "Multi 1", "Multi 2", "Multi 3", "Multi 4", "Multi 5"]
    );
    assert!(lines[0].starts_with("\"Fest, \"\"Deluxe\"\" - Alpha\","));
    assert_eq!(lines[1], "Cumulative Gems Spent,25,75,125,175,225");
    assert!(lines[2].starts_with("Cumulative P(No Pull),0.8"));
    assert!(lines[3].starts_with("P(1st Success this Multi),0.1"));
    assert!(lines[4].starts_with("Cond. Avg. Cost from this Multi,"));
    assert_eq!(lines[5], "");

    assert_eq!(cells(lines[6])[0], "Fest, \"Deluxe\" - Beta");
    assert_eq!(
        lines[10],
        "Cond. Avg. Cost from this Multi,Effectively Never (within CSV limit),\
         Effectively Never (within CSV limit),Effectively Never (within CSV limit),\
         Effectively Never (within CSV limit),Effectively Never (within CSV limit)"
    );
    assert_eq!(lines[11], "");
    assert_eq!(lines[12], "");

    assert_eq!(cells(lines[13])[0], "Second - Gamma");
    assert_eq!(lines.len(), 20);
}

/// Probability rows of the detailed CSV use seven decimals.
#[test]
fn test_detailed_csv_probabilities_have_seven_decimals() {
    let setup = CalculationSetup::from_banners(&banners()[1..]);
    let calculator = Calculator::new(CalcConfig {
        csv_horizon: 3,
        ..CalcConfig::default()
    });
    let csv = detailed_csv(&calculator.detailed(&setup)).unwrap();
    let not_pull = cells(csv.lines().nth(2).unwrap());

    for cell in &not_pull[1..] {
        let decimals = cell.split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 7);
    }
    let first: f64 = not_pull[1].parse().unwrap();
    assert!((first - 0.99f64.powi(11)).abs() < 1e-7);
}

// ============================================================================
// Graph CSV
// ============================================================================

/// Graph CSV blocks share one width and pad short series.
#[test]
fn test_graph_csv_width_and_padding() {
    let setup = CalculationSetup::from_banners(&banners());
    let mut calculator = Calculator::new(CalcConfig::default());
    let report = calculator.run(&setup);
    assert_eq!(report.max_multis, 40);

    let csv = graph_csv(&report, false).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    let header = cells(lines[0]);
    assert_eq!(header.len(), 41);
    assert_eq!(header[40], "Multi 40");

    // Banner 1 only has 12 multis.
    let normalized = cells(lines[1]);
    assert_eq!(normalized[0], "Normalized Rate (%)");
    assert!(!normalized[12].is_empty());
    assert!(normalized[13..].iter().all(|c| c.is_empty()));

    let cumulative = cells(lines[2]);
    assert_eq!(cumulative[0], "Cumulative Pull Chance (%)");
    let first: f64 = cumulative[1].parse().unwrap();
    let expected = (1.0 - 0.99f64.powi(10) * 0.95) * 100.0;
    assert!((first - expected).abs() < 1e-3);
    assert_eq!(lines[3], "");

    // Later blocks carry only the analysis name.
    let second_header = cells(lines[4]);
    assert_eq!(second_header[0], "Fest, \"Deluxe\" - Beta");
    assert!(second_header[1..].iter().all(|c| c.is_empty()));
    assert_eq!(second_header.len(), 41);

    let gamma = cells(lines[9]);
    assert_eq!(gamma[0], "Normalized Rate (%)");
    assert!(gamma[1..].iter().all(|c| !c.is_empty()));
    assert_eq!(lines.len(), 12);
}

/// The success-chance row is written when configured.
#[test]
fn test_graph_csv_success_row_from_config() {
    let setup = CalculationSetup::from_banners(&banners()[1..]);
    let config = CalcConfig::from_json(r#"{"includeSuccessRow": true}"#).unwrap();
    let include = config.include_success_row;
    let mut calculator = Calculator::new(config);
    let csv = graph_csv(&calculator.run(&setup), include).unwrap();

    let success = cells(csv.lines().nth(3).unwrap());
    assert_eq!(success[0], "Success Chance This Multi (%)");
    let hit: f64 = success[1].parse().unwrap();
    assert!((hit - (1.0 - 0.99f64.powi(11)) * 100.0).abs() < 1e-3);
}
