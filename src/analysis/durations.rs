/// Warning duration inference.
///
/// The historic warnings feed records the moment a warning was raised or
/// changed for an area, never the moment it ended. This module reconstructs
/// an estimated episode length for every record.
///
/// # Heuristic
///
/// 1. Partition records by warning area code.
/// 2. Sort each partition by `raised_at` (stable, so ties keep input order).
/// 3. Measure the gap from each record to the next one in its area.
/// 4. Pick the duration, in this order:
///    - last record in the area → default for its level
///    - gap > `max_gap_hours` → default (the next record is a new episode)
///    - "update" message → the gap itself
///    - otherwise → `min(gap, default)`
///
/// Level 4 ("no longer in force") records stay in the stream with a 0h
/// default so that the record before them still sees the right gap.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::config::{DEFAULT_DURATIONS, DEFAULT_MAX_GAP_HOURS, FwiiConfig, validate_level_table};
use crate::error::{FwiiError, Result};
use crate::model::{LevelTable, RawWarning, SeverityLevel, WarningEvent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for duration inference.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationConfig {
    /// Default duration per severity level, in hours.
    pub default_durations: LevelTable,
    /// Gaps longer than this split two records into unrelated episodes.
    pub max_gap_hours: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            default_durations: DEFAULT_DURATIONS,
            max_gap_hours: DEFAULT_MAX_GAP_HOURS,
        }
    }
}

impl DurationConfig {
    pub fn new(default_durations: LevelTable, max_gap_hours: f64) -> Result<Self> {
        validate_level_table(&default_durations, "default durations")?;
        if !max_gap_hours.is_finite() || max_gap_hours <= 0.0 {
            return Err(FwiiError::InvalidConfig(format!(
                "max_gap_hours must be a positive number (got {})",
                max_gap_hours
            )));
        }
        Ok(Self {
            default_durations,
            max_gap_hours,
        })
    }

    pub fn from_config(config: &FwiiConfig) -> Result<Self> {
        Self::new(config.default_durations()?, config.max_gap_hours())
    }

    pub fn default_duration(&self, level: SeverityLevel) -> f64 {
        self.default_durations.get(level)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A raw record that passed validation.
#[derive(Debug)]
struct CheckedRecord {
    area_code: String,
    raised_at: DateTime<Utc>,
    severity: SeverityLevel,
    severity_text: String,
    is_tidal: Option<bool>,
}

/// Converts raw warning records into `WarningEvent`s with durations.
#[derive(Debug, Clone, Default)]
pub struct DurationEngine {
    config: DurationConfig,
}

impl DurationEngine {
    pub fn new(config: DurationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DurationConfig {
        &self.config
    }

    /// Infers a duration for every record in the batch.
    ///
    /// Output is ordered by area code, then by `raised_at`; records raised at
    /// the same instant keep their input order. An empty batch yields an
    /// empty result. A record missing its area code, timestamp or severity
    /// level (or carrying a level outside 1-4) rejects the whole batch.
    pub fn infer_durations(&self, records: Vec<RawWarning>) -> Result<Vec<WarningEvent>> {
        let total = records.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut by_area: BTreeMap<String, Vec<CheckedRecord>> = BTreeMap::new();
        for (index, record) in records.into_iter().enumerate() {
            let checked = check_record(index, record)?;
            by_area.entry(checked.area_code.clone()).or_default().push(checked);
        }

        tracing::debug!("Partitioned {} records into {} areas", total, by_area.len());

        let mut events = Vec::with_capacity(total);
        for (area_code, mut area_records) in by_area {
            area_records.sort_by_key(|r| r.raised_at);
            tracing::debug!("{}: {} records", area_code, area_records.len());

            let next_times: Vec<Option<DateTime<Utc>>> = area_records
                .iter()
                .skip(1)
                .map(|r| Some(r.raised_at))
                .chain(std::iter::once(None))
                .collect();

            for (record, next) in area_records.into_iter().zip(next_times) {
                let gap = next.map(|n| gap_hours(record.raised_at, n));
                let is_update = is_update_text(&record.severity_text);
                let duration_hours = self.estimate_duration(record.severity, gap, is_update);

                events.push(WarningEvent {
                    area_code: record.area_code,
                    raised_at: record.raised_at,
                    severity: record.severity,
                    severity_text: record.severity_text,
                    is_update,
                    is_tidal: record.is_tidal,
                    duration_hours,
                });
            }
        }

        tracing::info!("Inferred durations for {} warning records", events.len());
        Ok(events)
    }

    /// Duration for a single record given the gap to the next record in the
    /// same area (`None` when it is the area's last record).
    pub fn estimate_duration(
        &self,
        severity: SeverityLevel,
        gap_to_next_hours: Option<f64>,
        is_update: bool,
    ) -> f64 {
        let default = self.config.default_duration(severity);

        match gap_to_next_hours {
            None => default,
            Some(gap) if gap > self.config.max_gap_hours => default,
            Some(gap) if is_update => gap,
            Some(gap) => gap.min(default),
        }
    }
}

/// True when the severity text marks the record as an update to an
/// existing warning (case-insensitive "update").
pub fn is_update_text(severity_text: &str) -> bool {
    severity_text.to_lowercase().contains("update")
}

/// Fractional hours from `from` to `to`, at millisecond resolution.
fn gap_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / 3_600_000.0
}

fn check_record(index: usize, record: RawWarning) -> Result<CheckedRecord> {
    let invalid = |field: &str| FwiiError::InvalidInput {
        index,
        field: field.to_string(),
    };

    let area_code = match record.area_code {
        Some(code) if !code.trim().is_empty() => code,
        _ => return Err(invalid("missing area code")),
    };
    let raised_at = record
        .raised_at
        .ok_or_else(|| invalid("missing raised timestamp"))?;
    let level = record
        .severity_level
        .ok_or_else(|| invalid("missing severity level"))?;
    let severity = SeverityLevel::from_level(level)
        .ok_or_else(|| invalid(&format!("severity level {} is not in 1-4", level)))?;

    Ok(CheckedRecord {
        area_code,
        raised_at,
        severity,
        severity_text: record.severity_text,
        is_tidal: record.is_tidal,
    })
}
