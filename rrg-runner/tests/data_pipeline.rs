//! Integration tests for the runner's data pipeline.
//!
//! CSV on disk → load → resample/window → compute → artifacts.

use chrono::{Datelike, NaiveDate};
use rrg_core::{InstrumentSet, RrgOutcome, RrgParams};
use rrg_runner::export::load_artifacts;
use rrg_runner::{
    load_prices_csv, run_from_source, run_rrg, save_artifacts, synthetic_prices,
    write_prices_csv, DataSource, RunConfig, Timeframe,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn small_config(timeframe: Timeframe) -> RunConfig {
    RunConfig {
        benchmark: "BENCH".into(),
        timeframe,
        lookback_months: None,
        params: RrgParams::new(2, 4, 5),
        instruments: InstrumentSet::from_pairs([("Alpha", "AAA"), ("Beta", "BBB")]),
    }
}

/// Writes synthetic daily closes for the config's symbols to a CSV file.
fn write_fixture(dir: &std::path::Path, config: &RunConfig) -> std::path::PathBuf {
    let table = synthetic_prices(&config.symbols(), date(2023, 1, 2), date(2023, 12, 29)).unwrap();
    let path = dir.join("prices.csv");
    let file = std::fs::File::create(&path).unwrap();
    write_prices_csv(&table, file).unwrap();
    path
}

#[test]
fn csv_file_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(Timeframe::Weekly);
    let path = write_fixture(dir.path(), &config);

    let run = run_from_source(&config, DataSource::Csv { path }).unwrap();
    assert!(!run.has_synthetic);
    // Weekly bars over the default six-month window.
    assert!(run.rows_used >= 25 && run.rows_used <= 27, "rows {}", run.rows_used);

    let report = run.outcome.report().expect("chart outcome");
    assert_eq!(report.tails.len(), 2);
    assert!(!report.benchmark.substituted);
    assert!(report.tails.iter().all(|t| t.points.len() == 5));
    // Weekly bars are stamped with the last trading day of the week.
    assert!(report
        .tails
        .iter()
        .flat_map(|t| &t.points)
        .all(|p| p.date.weekday() == chrono::Weekday::Fri));

    let out = tempfile::tempdir().unwrap();
    let run_dir = save_artifacts(&run, out.path()).unwrap();
    let loaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(loaded.config, run.config);
    assert_eq!(loaded.source, run.source);
    assert_eq!(
        loaded.outcome.report().map(|r| &r.fingerprint),
        Some(&report.fingerprint)
    );
    assert!(run_dir.join("tails.csv").exists());
}

#[test]
fn csv_reload_is_bit_identical_to_the_written_table() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(Timeframe::Native);
    let path = write_fixture(dir.path(), &config);

    let a = load_prices_csv(&path).unwrap();
    let b = load_prices_csv(&path).unwrap();
    assert_eq!(a, b);

    let run_a = run_rrg(&config, &a, DataSource::Csv { path: path.clone() }).unwrap();
    let run_b = run_rrg(&config, &b, DataSource::Csv { path }).unwrap();
    assert_eq!(run_a, run_b);
}

#[test]
fn missing_benchmark_column_is_substituted() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config(Timeframe::Weekly);
    let path = write_fixture(dir.path(), &config);
    config.benchmark = "NOT_IN_FILE".into();

    let run = run_from_source(&config, DataSource::Csv { path }).unwrap();
    let report = run.outcome.report().expect("a year of weekly rows is enough history");
    assert!(report.benchmark.substituted);
    assert_eq!(report.benchmark.requested, "NOT_IN_FILE");
    // Last valid requested column in table order.
    assert_eq!(report.benchmark.resolved, "BBB");
    assert!(!report.tails.is_empty());
}

#[test]
fn csv_with_no_requested_symbols_is_no_valid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    std::fs::write(&path, "date,ZZZ\n2024-01-05,1.0\n2024-01-12,2.0\n").unwrap();

    let run = run_from_source(&small_config(Timeframe::Native), DataSource::Csv { path }).unwrap();
    match run.outcome {
        RrgOutcome::NoValidData { requested } => {
            assert_eq!(requested, vec!["AAA", "BBB", "BENCH"]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
