/// Integration tests for the full FWII pipeline
///
/// Exercises raw records → tidal backfill → duration inference → scoring →
/// baseline establishment / normalization through the public API, the way
/// the `fwii` and `fwii_trend` binaries drive it. No database required.
///
/// Run with: cargo test --test fwii_pipeline

use chrono::{DateTime, Duration, TimeZone, Utc};
use fwii_service::analysis::durations::DurationEngine;
use fwii_service::analysis::indicators::IndicatorCalculator;
use fwii_service::baseline::{BaselineStore, MemoryBaselineStore};
use fwii_service::config::parse_config;
use fwii_service::model::RawWarning;
use fwii_service::pipeline::{FwiiPipeline, load_warnings_json};
use fwii_service::report::TrendReport;
use fwii_service::FwiiError;
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const REGION_TOML: &str = r#"
    [[warning_area]]
    fwd_code = "112WAFTUBA"
    is_tidal = false

    [[warning_area]]
    fwd_code = "112FWTSEV01"
    is_tidal = true
"#;

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn warning(area: &str, raised_at: DateTime<Utc>, level: u8, text: &str) -> RawWarning {
    RawWarning {
        area_code: Some(area.to_string()),
        raised_at: Some(raised_at),
        severity_level: Some(level),
        severity_text: text.to_string(),
        is_tidal: None,
    }
}

fn region_pipeline() -> FwiiPipeline {
    let config = parse_config(REGION_TOML).expect("region config should parse");
    FwiiPipeline::from_config(&config).expect("default tables are valid")
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fwii_pipeline_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

// ---------------------------------------------------------------------------
// 1. Duration inference scenario
// ---------------------------------------------------------------------------

#[test]
fn test_three_warnings_score_116() {
    let start = at(2022, 2, 18, 0);
    let mut records: Vec<RawWarning> = [0, 10, 40]
        .iter()
        .map(|h| warning("011WAF23", start + Duration::hours(*h), 2, "Flood Warning"))
        .collect();
    for r in &mut records {
        r.is_tidal = Some(false);
    }

    let events = DurationEngine::default().infer_durations(records).unwrap();
    let durations: Vec<f64> = events.iter().map(|e| e.duration_hours).collect();
    assert_eq!(durations, vec![10.0, 24.0, 24.0]);

    let scores = IndicatorCalculator::default().scorer().score_year(&events, 2022);
    assert_eq!(scores.fluvial.score, 116.0);
    assert_eq!(scores.fluvial.hours, 58.0);
    assert_eq!(scores.total.warning.count, 3);
}

#[test]
fn test_warning_before_new_year_sees_january_record() {
    let records = vec![
        warning("112WAFTUBA", at(2021, 12, 31, 20), 2, "Flood Warning Update"),
        warning("112WAFTUBA", at(2022, 1, 1, 6), 3, "Flood Alert"),
    ];
    let events = region_pipeline().infer(records).unwrap();
    assert_eq!(events[0].duration_hours, 10.0, "gap crosses the year boundary");

    let scores = region_pipeline().calculator().scorer().score_year(&events, 2021);
    assert_eq!(scores.fluvial.event_count, 1, "the January record belongs to 2022");
    assert_eq!(scores.fluvial.score, 20.0);
}

// ---------------------------------------------------------------------------
// 2. Baseline then normalize
// ---------------------------------------------------------------------------

fn year_of_warnings(year: i32, fluvial_warnings: usize, coastal_severe: usize) -> Vec<RawWarning> {
    let mut records = Vec::new();
    for i in 0..fluvial_warnings {
        // 10 days apart: each is a standalone 24h episode
        let raised = at(year, 1, 1, 0) + Duration::days(10 * i as i64);
        records.push(warning("112WAFTUBA", raised, 2, "Flood Warning"));
    }
    for i in 0..coastal_severe {
        let raised = at(year, 6, 1, 0) + Duration::days(10 * i as i64);
        records.push(warning("112FWTSEV01", raised, 1, "Severe Flood Warning"));
    }
    records
}

#[test]
fn test_baseline_then_normalized_year() {
    let pipeline = region_pipeline();
    let mut store = MemoryBaselineStore::new();

    // 2020: fluvial 2 × 24h × 2 = 96, coastal 1 × 12h × 3 = 36
    let base = pipeline.run_year(year_of_warnings(2020, 2, 1), 2020, &mut store).unwrap();
    assert_eq!(base.fluvial_score_raw, 96.0);
    assert_eq!(base.coastal_score_raw, 36.0);
    assert_eq!(base.composite_fwii, 100.0);

    // 2021: fluvial doubles, coastal unchanged
    let next = pipeline.run_year(year_of_warnings(2021, 4, 1), 2021, &mut store).unwrap();
    assert_eq!(next.fluvial_index, 200.0);
    assert_eq!(next.coastal_index, 100.0);
    assert_eq!(next.composite_fwii, 200.0 * 0.55 + 100.0 * 0.45);
    assert_eq!(next.severe_warnings, 1);
    assert_eq!(next.flood_warnings, 4);

    assert_eq!(store.load().unwrap().unwrap().year, 2020);
}

#[test]
fn test_unregistered_area_lands_in_other_bucket() {
    let pipeline = region_pipeline();
    let mut store = MemoryBaselineStore::new();
    let mut records = year_of_warnings(2020, 1, 1);
    records.push(warning("999UNKNOWN", at(2020, 3, 1, 0), 1, "Severe Flood Warning"));

    let result = pipeline.run_year(records, 2020, &mut store).unwrap();
    assert_eq!(result.other_events, 1);
    assert_eq!(result.other_score_raw, 36.0);
    assert_eq!(result.total_score_raw, 48.0 + 36.0 + 36.0);

    let baseline = store.baseline().unwrap();
    assert_eq!(baseline.total_score, 120.0, "total keeps the other bucket");
    assert_eq!(baseline.fluvial_score + baseline.coastal_score, 84.0);
}

#[test]
fn test_strict_baseline_year_enforced() {
    let toml = format!("{}\n[indicator]\nstrict_baseline = true\n", REGION_TOML);
    let config = parse_config(&toml).unwrap();
    let pipeline = FwiiPipeline::from_config(&config).unwrap();
    let mut store = MemoryBaselineStore::new();

    let result = pipeline.run_year(year_of_warnings(2023, 1, 1), 2023, &mut store);
    assert!(matches!(result, Err(FwiiError::MissingBaseline { year: 2023 })));
    assert!(store.baseline().is_none());
}

#[test]
fn test_invalid_record_fails_whole_batch() {
    let pipeline = region_pipeline();
    let mut store = MemoryBaselineStore::new();
    let mut records = year_of_warnings(2020, 3, 0);
    records[1].severity_level = None;

    let result = pipeline.run_year(records, 2020, &mut store);
    assert!(matches!(result, Err(FwiiError::InvalidInput { index: 1, .. })));
    assert!(store.baseline().is_none(), "no partial baseline on failure");
}

#[test]
fn test_composite_weights_validated_from_config() {
    for (fluvial, coastal) in [(0.5, 0.4), (0.6, 0.5)] {
        let config = parse_config(&format!(
            "[indicator]\nfluvial_weight = {}\ncoastal_weight = {}\n",
            fluvial, coastal
        ))
        .unwrap();
        assert!(matches!(
            FwiiPipeline::from_config(&config),
            Err(FwiiError::InvalidWeights { .. })
        ));
    }

    let config = parse_config("[indicator]\nfluvial_weight = 0.6\ncoastal_weight = 0.4\n").unwrap();
    assert!(FwiiPipeline::from_config(&config).is_ok());
}

// ---------------------------------------------------------------------------
// 3. JSON export input and trend report
// ---------------------------------------------------------------------------

#[test]
fn test_json_export_feeds_pipeline() {
    let dir = temp_path("json");
    let path = dir.join("warnings_2020.json");
    fs::write(
        &path,
        r#"[
            {"fwdCode": "112WAFTUBA", "timeRaised": "2020-02-15T06:00:00Z", "severityLevel": 2, "severity": "Flood Warning"},
            {"fwdCode": "112WAFTUBA", "timeRaised": "2020-02-15T16:00:00Z", "severityLevel": 4, "severity": "Warning no longer in force"},
            {"fwdCode": "112FWTSEV01", "timeRaised": "2020-10-01T03:00:00Z", "severityLevel": 3, "severity": "Flood Alert"}
        ]"#,
    )
    .unwrap();

    let records = load_warnings_json(&path).unwrap();
    assert_eq!(records.len(), 3);

    let mut store = MemoryBaselineStore::new();
    let result = region_pipeline().run_year(records, 2020, &mut store).unwrap();
    assert_eq!(result.fluvial_score_raw, 20.0, "warning lifted after 10h");
    assert_eq!(result.coastal_score_raw, 48.0);
    assert_eq!(result.fluvial_events, 2, "level 4 marker still counted as an event");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_json_export_with_null_severity_text() {
    let dir = temp_path("null_text");
    let path = dir.join("warnings_2020.json");
    fs::write(
        &path,
        r#"[{"fwdCode": "112WAFTUBA", "timeRaised": "2020-01-01T00:00:00Z",
             "severityLevel": 2, "severity": null}]"#,
    )
    .unwrap();

    let records = load_warnings_json(&path).unwrap();
    assert_eq!(records[0].severity_text, "");

    let events = region_pipeline().infer(records).unwrap();
    assert!(!events[0].is_update);
    assert_eq!(events[0].duration_hours, 24.0);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_trend_report_over_three_years() {
    let pipeline = region_pipeline();
    let mut store = MemoryBaselineStore::new();
    let results: Vec<_> = [(2020, 2, 1), (2021, 4, 1), (2022, 1, 0)]
        .into_iter()
        .map(|(year, fluvial, coastal)| {
            pipeline
                .run_year(year_of_warnings(year, fluvial, coastal), year, &mut store)
                .unwrap()
        })
        .collect();

    let report = TrendReport::build(results);
    assert_eq!(report.highest().unwrap().year, 2021);
    assert_eq!(report.lowest().unwrap().year, 2022);
    assert_eq!(report.year_on_year().len(), 2);
    assert!(report.render().contains("2020 → 2021"));
}
