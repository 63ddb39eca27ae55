/// Flood Warning Intensity Index (FWII) calculation.
///
/// Turns a year's annual scores into indices rebased against a baseline
/// year (baseline = 100), and combines the fluvial and coastal indices into
/// the composite:
///
/// ```text
/// FWII = fluvial_index × fluvial_weight + coastal_index × coastal_weight
/// ```
///
/// Each call runs in one of two modes, chosen by comparing the requested
/// year with the stored baseline (see `CalculationMode`). Warnings with no
/// tidal classification are reported but never enter the composite.

use crate::analysis::scoring::AnnualScorer;
use crate::baseline::BaselineStore;
use crate::config::{
    DEFAULT_BASELINE_YEAR, DEFAULT_COASTAL_WEIGHT, DEFAULT_FLUVIAL_WEIGHT, FwiiConfig,
};
use crate::error::{FwiiError, Result};
use crate::model::{AnnualScores, BaselineScores, NormalizedIndicators, WarningEvent};

/// Index value of the baseline year, by definition.
pub const BASELINE_INDEX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Composite weights
// ---------------------------------------------------------------------------

/// Fluvial/coastal weights for the composite index. Always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeWeights {
    fluvial: f64,
    coastal: f64,
}

impl CompositeWeights {
    pub fn new(fluvial: f64, coastal: f64) -> Result<Self> {
        let valid = fluvial.is_finite()
            && coastal.is_finite()
            && fluvial >= 0.0
            && coastal >= 0.0
            && fluvial + coastal == 1.0;
        if !valid {
            return Err(FwiiError::InvalidWeights { fluvial, coastal });
        }
        Ok(Self { fluvial, coastal })
    }

    pub fn fluvial(&self) -> f64 {
        self.fluvial
    }

    pub fn coastal(&self) -> f64 {
        self.coastal
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            fluvial: DEFAULT_FLUVIAL_WEIGHT,
            coastal: DEFAULT_COASTAL_WEIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstablishReason {
    /// Nothing stored yet.
    FirstRun,
    /// The requested year is the stored baseline's year.
    BaselineYearRerun,
}

/// What a single `calculate_indicators` call does.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationMode {
    /// The year's scores become the baseline and every index is 100.
    EstablishBaseline(EstablishReason),
    /// The year's scores are rebased against this snapshot.
    Normalize(BaselineScores),
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    scorer: AnnualScorer,
    weights: CompositeWeights,
    baseline_year: i32,
    strict_baseline: bool,
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self::new(AnnualScorer::default(), CompositeWeights::default(), DEFAULT_BASELINE_YEAR)
    }
}

impl IndicatorCalculator {
    pub fn new(scorer: AnnualScorer, weights: CompositeWeights, baseline_year: i32) -> Self {
        Self {
            scorer,
            weights,
            baseline_year,
            strict_baseline: false,
        }
    }

    /// With strict baselines, only `baseline_year` may establish the first
    /// baseline; any other year fails with `MissingBaseline` until it has.
    pub fn with_strict_baseline(mut self, strict: bool) -> Self {
        self.strict_baseline = strict;
        self
    }

    pub fn from_config(config: &FwiiConfig) -> Result<Self> {
        let weights = CompositeWeights::new(config.fluvial_weight(), config.coastal_weight())?;
        let scorer = AnnualScorer::new(config.severity_weights()?)?;
        Ok(Self::new(scorer, weights, config.baseline_year())
            .with_strict_baseline(config.indicator.strict_baseline))
    }

    pub fn weights(&self) -> &CompositeWeights {
        &self.weights
    }

    pub fn scorer(&self) -> &AnnualScorer {
        &self.scorer
    }

    pub fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    /// Chooses the mode for `year` given the currently stored baseline.
    pub fn select_mode(
        &self,
        year: i32,
        stored: Option<BaselineScores>,
    ) -> Result<CalculationMode> {
        match stored {
            Some(baseline) if baseline.year == year => {
                Ok(CalculationMode::EstablishBaseline(EstablishReason::BaselineYearRerun))
            }
            Some(baseline) => Ok(CalculationMode::Normalize(baseline)),
            None if self.strict_baseline && year != self.baseline_year => {
                Err(FwiiError::MissingBaseline { year })
            }
            None => Ok(CalculationMode::EstablishBaseline(EstablishReason::FirstRun)),
        }
    }

    /// Scores `year` and returns its indicators.
    ///
    /// In baseline mode the year's scores are saved to `store` and all three
    /// indices are exactly 100. Otherwise they are rebased against the
    /// stored snapshot, which is left untouched.
    pub fn calculate_indicators<S>(
        &self,
        events: &[WarningEvent],
        year: i32,
        store: &mut S,
    ) -> Result<NormalizedIndicators>
    where
        S: BaselineStore + ?Sized,
    {
        let scores = self.scorer.score_year(events, year);

        match self.select_mode(year, store.load()?)? {
            CalculationMode::EstablishBaseline(reason) => {
                let baseline = BaselineScores::try_from(&scores)?;
                store.save(&baseline)?;
                tracing::info!("{} established as baseline ({:?})", year, reason);
                Ok(baseline_indicators(&scores))
            }
            CalculationMode::Normalize(baseline) => {
                tracing::debug!("Normalizing {} against {} baseline", year, baseline.year);
                Ok(self.normalize(&scores, &baseline))
            }
        }
    }

    /// Rebases `scores` against `baseline`. A zero baseline score yields a
    /// zero index for that component.
    pub fn normalize(
        &self,
        scores: &AnnualScores,
        baseline: &BaselineScores,
    ) -> NormalizedIndicators {
        let fluvial_index = rebase(scores.fluvial.score, baseline.fluvial_score, "fluvial");
        let coastal_index = rebase(scores.coastal.score, baseline.coastal_score, "coastal");
        let composite_fwii =
            fluvial_index * self.weights.fluvial + coastal_index * self.weights.coastal;

        indicators(scores, fluvial_index, coastal_index, composite_fwii)
    }
}

/// Indicators for the baseline year itself: every index is 100.
pub fn baseline_indicators(scores: &AnnualScores) -> NormalizedIndicators {
    indicators(scores, BASELINE_INDEX, BASELINE_INDEX, BASELINE_INDEX)
}

fn rebase(score: f64, baseline_score: f64, component: &str) -> f64 {
    if baseline_score <= 0.0 {
        tracing::warn!("{} baseline score is zero, reporting index as 0", component);
        return 0.0;
    }
    (score / baseline_score) * BASELINE_INDEX
}

fn indicators(
    scores: &AnnualScores,
    fluvial_index: f64,
    coastal_index: f64,
    composite_fwii: f64,
) -> NormalizedIndicators {
    NormalizedIndicators {
        year: scores.year,
        fluvial_score_raw: scores.fluvial.score,
        coastal_score_raw: scores.coastal.score,
        other_score_raw: scores.other.score,
        total_score_raw: scores.total_score(),
        fluvial_index,
        coastal_index,
        composite_fwii,
        fluvial_hours: scores.fluvial.hours,
        coastal_hours: scores.coastal.hours,
        other_hours: scores.other.hours,
        fluvial_events: scores.fluvial.event_count,
        coastal_events: scores.coastal.event_count,
        other_events: scores.other.event_count,
        total_events: scores.total_events(),
        severe_warnings: scores.total.severe.count,
        flood_warnings: scores.total.warning.count,
        flood_alerts: scores.total.alert.count,
    }
}
