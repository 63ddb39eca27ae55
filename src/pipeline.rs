/// End-to-end indicator pipeline for one year.
///
/// raw records → tidal backfill (`regions`) → duration inference
/// (`analysis::durations`) → scoring and normalization
/// (`analysis::indicators`). The binaries and integration tests drive the
/// service through this type.

use std::fs;
use std::path::Path;

use crate::analysis::durations::{DurationConfig, DurationEngine};
use crate::analysis::indicators::IndicatorCalculator;
use crate::baseline::BaselineStore;
use crate::config::FwiiConfig;
use crate::error::Result;
use crate::model::{NormalizedIndicators, RawWarning, WarningEvent};
use crate::regions::RegionRegistry;

#[derive(Debug, Clone, Default)]
pub struct FwiiPipeline {
    regions: RegionRegistry,
    engine: DurationEngine,
    calculator: IndicatorCalculator,
}

impl FwiiPipeline {
    pub fn new(
        regions: RegionRegistry,
        engine: DurationEngine,
        calculator: IndicatorCalculator,
    ) -> Self {
        Self {
            regions,
            engine,
            calculator,
        }
    }

    /// Validates every configured table and weight up front.
    pub fn from_config(config: &FwiiConfig) -> Result<Self> {
        Ok(Self::new(
            RegionRegistry::new(config.warning_areas.iter().cloned()),
            DurationEngine::new(DurationConfig::from_config(config)?),
            IndicatorCalculator::from_config(config)?,
        ))
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    pub fn engine(&self) -> &DurationEngine {
        &self.engine
    }

    pub fn calculator(&self) -> &IndicatorCalculator {
        &self.calculator
    }

    /// Backfills tidal flags from the registry (when one is configured) and
    /// infers durations.
    pub fn infer(&self, mut records: Vec<RawWarning>) -> Result<Vec<WarningEvent>> {
        if !self.regions.is_empty() {
            let classified = self.regions.backfill_tidal(&mut records);
            tracing::debug!(
                "Classified {} of {} records from {} registered areas",
                classified,
                records.len(),
                self.regions.len()
            );
        }
        self.engine.infer_durations(records)
    }

    pub fn run_year<S>(
        &self,
        records: Vec<RawWarning>,
        year: i32,
        store: &mut S,
    ) -> Result<NormalizedIndicators>
    where
        S: BaselineStore + ?Sized,
    {
        let events = self.infer(records)?;
        self.calculator.calculate_indicators(&events, year, store)
    }
}

/// Reads a processed warnings export: a JSON array of records using the
/// feed's field names (`fwdCode`, `timeRaised`, `severityLevel`, ...).
pub fn load_warnings_json(path: impl AsRef<Path>) -> Result<Vec<RawWarning>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let records: Vec<RawWarning> = serde_json::from_str(&contents)?;
    tracing::info!("Loaded {} warnings from {}", records.len(), path.display());
    Ok(records)
}
