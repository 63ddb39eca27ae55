/// fwii_service: Flood Warning Intensity Index for a warning region.
///
/// Reconstructs warning durations from the point-event historic warnings
/// feed and turns them into a baseline-rebased, year-over-year comparable
/// intensity index.
///
/// # Module structure
///
/// ```text
/// fwii_service
/// ├── model     — shared data types (RawWarning, WarningEvent, BaselineScores, …)
/// ├── error     — FwiiError and Result
/// ├── config    — fwii.toml loader (durations, weights, baseline, warning areas)
/// ├── regions   — warning area registry and tidal backfill
/// ├── baseline  — BaselineStore trait, TOML file and in-memory stores
/// ├── db        — PostgreSQL connection, warning loading, baseline store
/// ├── pipeline  — backfill → inference → indicators for one year
/// ├── report    — multi-year trend report and JSON export
/// ├── logging   — tracing subscriber setup for the binaries
/// └── analysis
///     ├── durations  — duration inference from raised/changed events
///     ├── scoring    — duration-weighted annual scores
///     └── indicators — baseline modes and normalized indices
/// ```

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod regions;
pub mod report;

pub use error::{FwiiError, Result};
