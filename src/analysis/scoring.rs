/// Annual duration-weighted scoring.
///
/// Filters inferred warning events to a calendar year and sums
/// `duration_hours × severity_weight` into three buckets keyed by tidal
/// classification: fluvial (`Some(false)`), coastal (`Some(true)`) and
/// other (`None`). Each bucket also carries a per-level breakdown, and a
/// year-wide breakdown is kept across all buckets.

use chrono::Datelike;

use crate::config::{DEFAULT_SEVERITY_WEIGHTS, validate_level_table};
use crate::error::Result;
use crate::model::{AnnualScores, BucketScores, LevelTable, SeverityBreakdown, WarningEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnualScorer {
    severity_weights: LevelTable,
}

impl Default for AnnualScorer {
    fn default() -> Self {
        Self {
            severity_weights: DEFAULT_SEVERITY_WEIGHTS,
        }
    }
}

impl AnnualScorer {
    pub fn new(severity_weights: LevelTable) -> Result<Self> {
        validate_level_table(&severity_weights, "severity weights")?;
        Ok(Self { severity_weights })
    }

    pub fn severity_weights(&self) -> &LevelTable {
        &self.severity_weights
    }

    /// Scores every event raised in `year` (UTC calendar year).
    pub fn score_year(&self, events: &[WarningEvent], year: i32) -> AnnualScores {
        let mut fluvial = BucketScores::default();
        let mut coastal = BucketScores::default();
        let mut other = BucketScores::default();
        let mut total = SeverityBreakdown::default();

        for event in events.iter().filter(|e| e.raised_at.year() == year) {
            let bucket = match event.is_tidal {
                Some(false) => &mut fluvial,
                Some(true) => &mut coastal,
                None => &mut other,
            };
            let weighted = event.weighted_score(&self.severity_weights);

            bucket.score += weighted;
            bucket.hours += event.duration_hours;
            bucket.event_count += 1;
            add_to_breakdown(&mut bucket.by_severity, event, weighted);
            add_to_breakdown(&mut total, event, weighted);
        }

        if other.event_count > 0 {
            tracing::warn!(
                "{}: {} events have no tidal classification and are excluded from the composite",
                year,
                other.event_count
            );
        }

        AnnualScores {
            year,
            fluvial,
            coastal,
            other,
            total,
        }
    }
}

fn add_to_breakdown(breakdown: &mut SeverityBreakdown, event: &WarningEvent, weighted: f64) {
    // Level 4 has no slot
    if let Some(stats) = breakdown.get_mut(event.severity) {
        stats.count += 1;
        stats.total_hours += event.duration_hours;
        stats.weighted_score += weighted;
    }
}
