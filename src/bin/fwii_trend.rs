//! FWII Trend Report
//!
//! Calculates the Flood Warning Intensity Index for a run of years and
//! prints the trend report (year-on-year changes, component bars, key
//! findings). Years are processed in ascending order, so when no baseline
//! exists yet the first year establishes it.
//!
//! Usage:
//!   cargo run --bin fwii_trend -- 2020 2024
//!   cargo run --bin fwii_trend -- 2020 2024 --input-dir data/processed
//!   cargo run --bin fwii_trend -- 2020 2024 --json > fwii_timeseries.json
//!
//! Options:
//!   --config PATH     Configuration file (default: fwii.toml)
//!   --input-dir DIR   Read warnings_<year>.json exports instead of the database
//!   --json            Print indicators as JSON instead of the text report
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string (when --input-dir is not given)

use fwii_service::baseline::TomlBaselineStore;
use fwii_service::config::{self, DEFAULT_CONFIG_PATH};
use fwii_service::pipeline::{FwiiPipeline, load_warnings_json};
use fwii_service::report::TrendReport;
use fwii_service::{db, logging};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let years: Vec<i32> = args.iter().skip(1).filter_map(|a| a.parse().ok()).collect();
    let (from, to) = match years.as_slice() {
        [from, to, ..] if from <= to => (*from, *to),
        _ => {
            eprintln!(
                "Usage: {} <from-year> <to-year> [--config PATH] [--input-dir DIR] [--json]",
                args[0]
            );
            std::process::exit(1);
        }
    };
    let config_path = value_of("--config").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let input_dir = value_of("--input-dir").map(PathBuf::from);
    let json = args.iter().any(|a| a == "--json");

    let config = config::load_config(&config_path)?;
    let pipeline = FwiiPipeline::from_config(&config)?;
    let mut store = TomlBaselineStore::new(config.baseline_path());

    let mut client = match input_dir {
        Some(_) => None,
        None => Some(db::connect_and_verify(&[db::FWII_SCHEMA]).unwrap_or_else(|e| {
            eprintln!("\n{}\n", e);
            std::process::exit(1);
        })),
    };

    let mut results = Vec::new();
    for year in from..=to {
        let records = match &input_dir {
            Some(dir) => {
                let path = dir.join(format!("warnings_{}.json", year));
                if !path.exists() {
                    eprintln!("⚠ No data for {} ({} missing)", year, path.display());
                    continue;
                }
                load_warnings_json(&path)?
            }
            None => {
                let client = client.as_mut().ok_or("database client not connected")?;
                db::load_warnings(client, year, pipeline.engine().config().max_gap_hours)?
            }
        };

        // Any failing year aborts the whole report
        let indicators = pipeline.run_year(records, year, &mut store)?;
        results.push(indicators);
    }

    let report = TrendReport::build(results);
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("{}", "=".repeat(80));
    println!("FLOOD WARNING INTENSITY INDEX (FWII) TREND REPORT {}-{}", from, to);
    println!("{}\n", "=".repeat(80));
    print!("{}", report.render());

    Ok(())
}
