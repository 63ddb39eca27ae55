/// Baseline score persistence.
///
/// The baseline year's scores are the denominator for every later index.
/// They are written once when the baseline year is calculated and read on
/// every subsequent run. `BaselineStore` is the seam the indicator
/// calculator talks to; this module provides the TOML file store used by the
/// CLI and an in-memory store. The PostgreSQL store lives in `db`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::BaselineScores;

/// Load/save contract for the persisted baseline snapshot.
///
/// Saving replaces whatever snapshot was stored before (last write wins), so
/// callers that may establish a baseline concurrently must serialize those
/// calls themselves.
pub trait BaselineStore {
    fn load(&mut self) -> Result<Option<BaselineScores>>;
    fn save(&mut self, baseline: &BaselineScores) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryBaselineStore {
    baseline: Option<BaselineScores>,
    saves: usize,
}

impl MemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baseline(baseline: BaselineScores) -> Self {
        Self {
            baseline: Some(baseline),
            saves: 0,
        }
    }

    pub fn baseline(&self) -> Option<&BaselineScores> {
        self.baseline.as_ref()
    }

    /// Number of `save` calls since construction.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn load(&mut self) -> Result<Option<BaselineScores>> {
        Ok(self.baseline.clone())
    }

    fn save(&mut self, baseline: &BaselineScores) -> Result<()> {
        self.baseline = Some(baseline.clone());
        self.saves += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TOML file store
// ---------------------------------------------------------------------------

/// On-disk layout of the baseline file.
#[derive(Debug, Serialize, Deserialize)]
struct BaselineDocument {
    #[serde(default)]
    description: String,
    baseline: BaselineScores,
}

/// Baseline kept in a TOML file, e.g. `config/baseline_2020.toml`.
#[derive(Debug, Clone)]
pub struct TomlBaselineStore {
    path: PathBuf,
}

impl TomlBaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BaselineStore for TomlBaselineStore {
    /// A missing file means no baseline has been established yet.
    fn load(&mut self) -> Result<Option<BaselineScores>> {
        if !self.path.exists() {
            tracing::debug!("No baseline file at {}", self.path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let document: BaselineDocument = toml::from_str(&contents)?;
        tracing::info!(
            "Loaded {} baseline from {}",
            document.baseline.year,
            self.path.display()
        );
        Ok(Some(document.baseline))
    }

    fn save(&mut self, baseline: &BaselineScores) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = BaselineDocument {
            description: format!("Baseline scores for {} (normalized to 100)", baseline.year),
            baseline: baseline.clone(),
        };
        let contents = toml::to_string_pretty(&document)?;

        // Write beside the target then rename, so readers never see a
        // half-written file.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        tracing::info!("Saved {} baseline to {}", baseline.year, self.path.display());
        Ok(())
    }
}
