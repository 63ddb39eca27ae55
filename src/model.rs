/// Core data types for the flood warning intensity service.
///
/// This module defines the shared domain model imported by all other modules:
/// raw warning records as handed over by the ingest collaborators, warning
/// events with inferred durations, annual score breakdowns, and the
/// baseline/indicator records persisted or reported downstream.
/// It contains no logic beyond small accessors, and no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::FwiiError;

// ---------------------------------------------------------------------------
// Severity levels
// ---------------------------------------------------------------------------

/// Environment Agency warning severity, numbered as in the source feed.
///
/// Lower numbers are more severe. Level 4 is a terminal marker issued when a
/// warning is withdrawn; it carries no weight when scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeverityLevel {
    Severe,
    Warning,
    Alert,
    NoLongerInForce,
}

impl SeverityLevel {
    /// Every level, in feed order.
    pub const ALL: [SeverityLevel; 4] = [
        SeverityLevel::Severe,
        SeverityLevel::Warning,
        SeverityLevel::Alert,
        SeverityLevel::NoLongerInForce,
    ];

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SeverityLevel::Severe),
            2 => Some(SeverityLevel::Warning),
            3 => Some(SeverityLevel::Alert),
            4 => Some(SeverityLevel::NoLongerInForce),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            SeverityLevel::Severe => 1,
            SeverityLevel::Warning => 2,
            SeverityLevel::Alert => 3,
            SeverityLevel::NoLongerInForce => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityLevel::Severe => "Severe Flood Warning",
            SeverityLevel::Warning => "Flood Warning",
            SeverityLevel::Alert => "Flood Alert",
            SeverityLevel::NoLongerInForce => "Warning No Longer In Force",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.label(), self.level())
    }
}

impl TryFrom<u8> for SeverityLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        SeverityLevel::from_level(level).ok_or_else(|| format!("unknown severity level {}", level))
    }
}

impl From<SeverityLevel> for u8 {
    fn from(level: SeverityLevel) -> Self {
        level.level()
    }
}

// ---------------------------------------------------------------------------
// Warning records
// ---------------------------------------------------------------------------

/// A single warning record as delivered by the ingest collaborators.
///
/// Area code, timestamp and severity level are required by contract but are
/// kept optional here so that a malformed batch can be rejected with the
/// offending record's position instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWarning {
    #[serde(rename = "fwdCode")]
    pub area_code: Option<String>,
    #[serde(rename = "timeRaised")]
    pub raised_at: Option<DateTime<Utc>>,
    pub severity_level: Option<u8>,
    #[serde(rename = "severity", default, deserialize_with = "null_as_empty")]
    pub severity_text: String,
    #[serde(default)]
    pub is_tidal: Option<bool>,
}

/// Exports carry `"severity": null` for records without message text.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A warning record with its inferred episode duration.
///
/// Created once per input record by `analysis::durations` and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningEvent {
    pub area_code: String,
    pub raised_at: DateTime<Utc>,
    pub severity: SeverityLevel,
    pub severity_text: String,
    pub is_update: bool,
    /// `None` when the area is missing from the region registry.
    pub is_tidal: Option<bool>,
    pub duration_hours: f64,
}

impl WarningEvent {
    /// Duration-weighted score of this event under the given weights.
    pub fn weighted_score(&self, weights: &LevelTable) -> f64 {
        self.duration_hours * weights.get(self.severity)
    }
}

// ---------------------------------------------------------------------------
// Per-level tables
// ---------------------------------------------------------------------------

/// One `f64` per severity level: default durations or severity weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelTable {
    pub severe: f64,
    pub warning: f64,
    pub alert: f64,
    pub no_longer_in_force: f64,
}

impl LevelTable {
    pub fn get(&self, level: SeverityLevel) -> f64 {
        match level {
            SeverityLevel::Severe => self.severe,
            SeverityLevel::Warning => self.warning,
            SeverityLevel::Alert => self.alert,
            SeverityLevel::NoLongerInForce => self.no_longer_in_force,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeverityLevel, f64)> + '_ {
        SeverityLevel::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

// ---------------------------------------------------------------------------
// Annual scores
// ---------------------------------------------------------------------------

/// Count, hours and weighted score for one severity level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelStats {
    pub count: usize,
    pub total_hours: f64,
    pub weighted_score: f64,
}

/// Per-level breakdown over the scored levels (1-3).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub severe: LevelStats,
    pub warning: LevelStats,
    pub alert: LevelStats,
}

impl SeverityBreakdown {
    /// Stats for a scored level; `None` for level 4.
    pub fn get(&self, level: SeverityLevel) -> Option<&LevelStats> {
        match level {
            SeverityLevel::Severe => Some(&self.severe),
            SeverityLevel::Warning => Some(&self.warning),
            SeverityLevel::Alert => Some(&self.alert),
            SeverityLevel::NoLongerInForce => None,
        }
    }

    pub(crate) fn get_mut(&mut self, level: SeverityLevel) -> Option<&mut LevelStats> {
        match level {
            SeverityLevel::Severe => Some(&mut self.severe),
            SeverityLevel::Warning => Some(&mut self.warning),
            SeverityLevel::Alert => Some(&mut self.alert),
            SeverityLevel::NoLongerInForce => None,
        }
    }
}

/// Aggregate scores for one tidal-classification bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketScores {
    pub score: f64,
    pub hours: f64,
    pub event_count: usize,
    pub by_severity: SeverityBreakdown,
}

/// Scores for a single year, split fluvial / coastal / unclassified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualScores {
    pub year: i32,
    /// `is_tidal == Some(false)`
    pub fluvial: BucketScores,
    /// `is_tidal == Some(true)`
    pub coastal: BucketScores,
    /// `is_tidal == None`; reported, never part of the composite.
    pub other: BucketScores,
    /// Breakdown over every event in the year regardless of bucket.
    pub total: SeverityBreakdown,
}

impl AnnualScores {
    pub fn total_score(&self) -> f64 {
        self.fluvial.score + self.coastal.score + self.other.score
    }

    pub fn total_events(&self) -> usize {
        self.fluvial.event_count + self.coastal.event_count + self.other.event_count
    }
}

// ---------------------------------------------------------------------------
// Baseline and indicators
// ---------------------------------------------------------------------------

/// Snapshot of the baseline year's aggregate scores (index = 100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineScores {
    pub year: i32,
    pub fluvial_score: f64,
    pub coastal_score: f64,
    pub total_score: f64,
    #[serde(default)]
    pub fluvial_hours: f64,
    #[serde(default)]
    pub coastal_hours: f64,
    #[serde(default)]
    pub fluvial_events: u32,
    #[serde(default)]
    pub coastal_events: u32,
}

impl TryFrom<&AnnualScores> for BaselineScores {
    type Error = FwiiError;

    fn try_from(scores: &AnnualScores) -> Result<Self, FwiiError> {
        let count = |n: usize, bucket: &str| {
            u32::try_from(n).map_err(|_| {
                FwiiError::OutOfRange(format!("{} {} events in {}", n, bucket, scores.year))
            })
        };
        Ok(BaselineScores {
            year: scores.year,
            fluvial_score: scores.fluvial.score,
            coastal_score: scores.coastal.score,
            total_score: scores.total_score(),
            fluvial_hours: scores.fluvial.hours,
            coastal_hours: scores.coastal.hours,
            fluvial_events: count(scores.fluvial.event_count, "fluvial")?,
            coastal_events: count(scores.coastal.event_count, "coastal")?,
        })
    }
}

/// Flood Warning Intensity Index values for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIndicators {
    pub year: i32,

    // Raw duration-weighted scores
    pub fluvial_score_raw: f64,
    pub coastal_score_raw: f64,
    pub other_score_raw: f64,
    pub total_score_raw: f64,

    // Baseline year = 100
    pub fluvial_index: f64,
    pub coastal_index: f64,
    pub composite_fwii: f64,

    pub fluvial_hours: f64,
    pub coastal_hours: f64,
    pub other_hours: f64,
    pub fluvial_events: usize,
    pub coastal_events: usize,
    pub other_events: usize,
    pub total_events: usize,

    // Counts over the whole year, any classification
    pub severe_warnings: usize,
    pub flood_warnings: usize,
    pub flood_alerts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_level_round_trips_feed_numbers() {
        for level in 1..=4u8 {
            let sev = SeverityLevel::from_level(level).expect("1-4 are valid");
            assert_eq!(sev.level(), level);
        }
        assert!(SeverityLevel::from_level(0).is_none());
        assert!(SeverityLevel::from_level(5).is_none());
    }

    #[test]
    fn test_level_four_is_not_scored() {
        let breakdown = SeverityBreakdown::default();
        assert!(breakdown.get(SeverityLevel::NoLongerInForce).is_none());
    }

    #[test]
    fn test_raw_warning_deserializes_feed_field_names() {
        let json = r#"{
            "fwdCode": "112WAFTUBA",
            "timeRaised": "2020-02-15T09:30:00Z",
            "severityLevel": 2,
            "severity": "Flood Warning Update",
            "isTidal": false
        }"#;
        let raw: RawWarning = serde_json::from_str(json).expect("record should parse");
        assert_eq!(raw.area_code.as_deref(), Some("112WAFTUBA"));
        assert_eq!(raw.severity_level, Some(2));
        assert_eq!(raw.is_tidal, Some(false));
        assert!(raw.raised_at.is_some());
    }

    #[test]
    fn test_raw_warning_tolerates_missing_optional_fields() {
        let json = r#"{
            "fwdCode": "112FWFAVON",
            "timeRaised": "2021-01-01T00:00:00Z",
            "severityLevel": 3
        }"#;
        let raw: RawWarning = serde_json::from_str(json).expect("record should parse");
        assert_eq!(raw.severity_text, "");
        assert_eq!(raw.is_tidal, None);
    }

    #[test]
    fn test_raw_warning_null_severity_text_is_empty() {
        let json = r#"[{
            "fwdCode": "112FWFAVON",
            "timeRaised": "2020-01-01T00:00:00Z",
            "severityLevel": 2,
            "severity": null,
            "isTidal": null
        }]"#;
        let records: Vec<RawWarning> = serde_json::from_str(json).expect("null text is tolerated");
        assert_eq!(records[0].severity_text, "");
        assert_eq!(records[0].severity_level, Some(2));
    }

    #[test]
    fn test_baseline_from_scores_copies_components() {
        let mut scores = AnnualScores {
            year: 2020,
            fluvial: BucketScores::default(),
            coastal: BucketScores::default(),
            other: BucketScores::default(),
            total: SeverityBreakdown::default(),
        };
        scores.fluvial.score = 96.0;
        scores.fluvial.event_count = 2;
        scores.other.score = 10.0;

        let baseline = BaselineScores::try_from(&scores).unwrap();
        assert_eq!(baseline.year, 2020);
        assert_eq!(baseline.fluvial_events, 2);
        assert_eq!(baseline.total_score, 106.0);
    }

    #[test]
    fn test_severity_level_serializes_as_number() {
        let json = serde_json::to_string(&SeverityLevel::Alert).unwrap();
        assert_eq!(json, "3");
        let bad: Result<SeverityLevel, _> = serde_json::from_str("7");
        assert!(bad.is_err());
    }
}
