//! Flood Warning Intensity Index - single year calculation
//!
//! Loads a year of historic flood warnings, infers warning durations,
//! scores them and rebases the result against the stored baseline year.
//! Running the baseline year (or any year when no baseline exists yet)
//! establishes the baseline.
//!
//! Usage:
//!   cargo run --release -- 2020                          # establish baseline
//!   cargo run --release -- 2024                          # normalized to baseline
//!   cargo run --release -- 2024 --input data/processed/warnings_2024.json
//!   cargo run --release -- 2024 --json                   # machine-readable output
//!
//! Options:
//!   --config PATH   Configuration file (default: fwii.toml)
//!   --input FILE    JSON warnings export instead of the database
//!   --json          Print indicators as JSON
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string (when --input is not given)
//!   RUST_LOG     - log filter (default: info)

use fwii_service::baseline::{BaselineStore, TomlBaselineStore};
use fwii_service::config::{self, DEFAULT_CONFIG_PATH};
use fwii_service::model::NormalizedIndicators;
use fwii_service::pipeline::{FwiiPipeline, load_warnings_json};
use fwii_service::{db, logging, report};
use std::env;
use std::path::PathBuf;

struct Args {
    year: i32,
    config_path: PathBuf,
    input: Option<PathBuf>,
    json: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <year> [--config PATH] [--input FILE.json] [--json]", program);
    std::process::exit(1);
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("fwii");

    let mut year = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut input = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--input" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a path", args[i]);
                    usage(program);
                };
                if args[i] == "--config" {
                    config_path = PathBuf::from(value);
                } else {
                    input = Some(PathBuf::from(value));
                }
                i += 2;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            other => match other.parse::<i32>() {
                Ok(y) if year.is_none() => {
                    year = Some(y);
                    i += 1;
                }
                _ => {
                    eprintln!("Unknown argument: {}", other);
                    usage(program);
                }
            },
        }
    }

    let Some(year) = year else { usage(program) };
    Args {
        year,
        config_path,
        input,
        json,
    }
}

fn main() {
    logging::init();
    let args = parse_args();

    if let Err(e) = run(&args) {
        eprintln!("\n❌ FWII calculation for {} failed: {}\n", args.year, e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> fwii_service::Result<()> {
    let config = config::load_config(&args.config_path)?;
    let pipeline = FwiiPipeline::from_config(&config)?;
    let max_gap = pipeline.engine().config().max_gap_hours;

    let records = match &args.input {
        Some(path) => load_warnings_json(path)?,
        None => {
            let mut client = db::connect_and_verify(&[db::FWII_SCHEMA])?;
            db::load_warnings(&mut client, args.year, max_gap)?
        }
    };

    let mut store = TomlBaselineStore::new(config.baseline_path());
    let indicators = pipeline.run_year(records, args.year, &mut store)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&indicators)?);
    } else {
        let baseline_year = store
            .load()?
            .map(|b| b.year)
            .unwrap_or_else(|| config.baseline_year());
        print_results(&indicators, baseline_year, pipeline.calculator().weights().fluvial());
    }
    Ok(())
}

fn print_results(i: &NormalizedIndicators, baseline_year: i32, fluvial_weight: f64) {
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);

    println!("{}", rule);
    println!("FLOOD WARNING INTENSITY INDEX (FWII) FOR {}", i.year);
    println!("{}\n", rule);

    println!("RAW SCORES (Duration-Weighted)");
    println!("{}", thin);
    println!(
        "  Fluvial Score:    {:8.1}  ({} events, {:.1} hours)",
        i.fluvial_score_raw, i.fluvial_events, i.fluvial_hours
    );
    println!(
        "  Coastal Score:    {:8.1}  ({} events, {:.1} hours)",
        i.coastal_score_raw, i.coastal_events, i.coastal_hours
    );
    if i.other_events > 0 {
        println!(
            "  Unclassified:     {:8.1}  ({} events, excluded from composite)",
            i.other_score_raw, i.other_events
        );
    }
    println!("  Total Score:      {:8.1}  ({} events)\n", i.total_score_raw, i.total_events);

    println!("NORMALIZED INDICATORS (Baseline = 100)");
    println!("{}", thin);
    println!("  Fluvial Index:    {:8.1}", i.fluvial_index);
    println!("  Coastal Index:    {:8.1}", i.coastal_index);
    println!(
        "  COMPOSITE FWII:   {:8.1}  ({:.0}% fluvial + {:.0}% coastal)\n",
        i.composite_fwii,
        fluvial_weight * 100.0,
        (1.0 - fluvial_weight) * 100.0
    );

    println!("WARNING COUNTS BY SEVERITY");
    println!("{}", thin);
    println!("  Severe Flood Warnings (Level 1):  {}", i.severe_warnings);
    println!("  Flood Warnings (Level 2):         {}", i.flood_warnings);
    println!("  Flood Alerts (Level 3):           {}\n", i.flood_alerts);

    println!("INTERPRETATION");
    println!("{}", thin);
    println!("  {}\n", report::interpret(i, baseline_year));
}
