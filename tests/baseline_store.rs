/// Integration tests for baseline persistence
///
/// Covers the TOML file store used by the binaries, and (ignored by
/// default) the PostgreSQL store.
///
/// Prerequisites for the ignored tests:
/// - PostgreSQL running with the fwii schema applied (sql/001_fwii_schema.sql)
/// - DATABASE_URL set in .env
///
/// Run with: cargo test --test baseline_store -- --include-ignored --test-threads=1

use fwii_service::analysis::indicators::IndicatorCalculator;
use fwii_service::baseline::{BaselineStore, TomlBaselineStore};
use fwii_service::db;
use fwii_service::model::BaselineScores;
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fwii_baseline_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn sample(year: i32) -> BaselineScores {
    BaselineScores {
        year,
        fluvial_score: 1234.5,
        coastal_score: 321.25,
        total_score: 1600.0,
        fluvial_hours: 600.0,
        coastal_hours: 140.5,
        fluvial_events: 42,
        coastal_events: 7,
    }
}

// ---------------------------------------------------------------------------
// TOML store
// ---------------------------------------------------------------------------

#[test]
fn test_missing_file_means_no_baseline() {
    let dir = temp_dir("missing");
    let mut store = TomlBaselineStore::new(dir.join("baseline_2020.toml"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_save_creates_directories_and_reloads() {
    let dir = temp_dir("reload");
    let path = dir.join("config").join("baseline_2020.toml");
    let mut store = TomlBaselineStore::new(&path);

    store.save(&sample(2020)).unwrap();
    assert!(path.exists());

    let mut reopened = TomlBaselineStore::new(&path);
    assert_eq!(reopened.load().unwrap(), Some(sample(2020)));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Baseline scores for 2020"));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = temp_dir("overwrite");
    let mut store = TomlBaselineStore::new(dir.join("baseline.toml"));

    store.save(&sample(2019)).unwrap();
    store.save(&sample(2020)).unwrap();
    assert_eq!(store.load().unwrap().unwrap().year, 2020);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = temp_dir("malformed");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("baseline.toml");
    fs::write(&path, "[baseline]\nyear = \"twenty twenty\"\n").unwrap();

    let mut store = TomlBaselineStore::new(&path);
    assert!(store.load().is_err());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_calculator_establishes_baseline_in_file() {
    let dir = temp_dir("calculator");
    let mut store = TomlBaselineStore::new(dir.join("baseline_2020.toml"));
    let calc = IndicatorCalculator::default();

    let result = calc.calculate_indicators(&[], 2020, &mut store).unwrap();
    assert_eq!(result.composite_fwii, 100.0);

    let saved = store.load().unwrap().expect("baseline file written");
    assert_eq!(saved.year, 2020);
    assert_eq!(saved.fluvial_score, 0.0);

    // Zero-score baseline: later activity reports as index 0, never NaN
    let later = calc.calculate_indicators(&[], 2021, &mut store).unwrap();
    assert_eq!(later.fluvial_index, 0.0);
    assert_eq!(later.coastal_index, 0.0);
    assert_eq!(later.composite_fwii, 0.0);

    let _ = fs::remove_dir_all(dir);
}

// ---------------------------------------------------------------------------
// PostgreSQL store
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Only run when database is available
fn test_pg_store_round_trip() {
    let client = db::connect_and_verify(&[db::FWII_SCHEMA]).expect("database should be reachable");
    let mut store = db::PgBaselineStore::new(client);

    store.save(&sample(2020)).unwrap();
    store.save(&sample(2020)).unwrap();
    assert_eq!(store.load().unwrap(), Some(sample(2020)));
}

#[test]
#[ignore] // Only run when database is available
fn test_load_warnings_for_year() {
    let mut client =
        db::connect_and_verify(&[db::FWII_SCHEMA]).expect("database should be reachable");
    let warnings = db::load_warnings(&mut client, 2020, 72.0).expect("query should succeed");
    for w in &warnings {
        assert!(w.area_code.is_some());
        assert!(w.raised_at.is_some());
    }
}
