/// Service configuration loader - parses fwii.toml
///
/// Separates the indicator's tunables (default durations, gap cut-off,
/// severity weights, composite weights, baseline year) and the warning area
/// registry from code, so they can be adjusted without recompiling.
///
/// Every key is optional and falls back to its documented default; unknown
/// keys are rejected so that a typo cannot silently revert a setting.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FwiiError, Result};
use crate::model::LevelTable;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "fwii.toml";

/// Default episode length in hours when no better estimate exists.
pub const DEFAULT_DURATIONS: LevelTable = LevelTable {
    severe: 12.0,
    warning: 24.0,
    alert: 48.0,
    no_longer_in_force: 0.0,
};

/// Severe warnings weigh three times an alert.
pub const DEFAULT_SEVERITY_WEIGHTS: LevelTable = LevelTable {
    severe: 3.0,
    warning: 2.0,
    alert: 1.0,
    no_longer_in_force: 0.0,
};

pub const DEFAULT_MAX_GAP_HOURS: f64 = 72.0;
pub const DEFAULT_BASELINE_YEAR: i32 = 2020;
pub const DEFAULT_FLUVIAL_WEIGHT: f64 = 0.55;
pub const DEFAULT_COASTAL_WEIGHT: f64 = 0.45;
pub const DEFAULT_BASELINE_PATH: &str = "config/baseline_2020.toml";

// ============================================================================
// TOML Configuration Structures
// ============================================================================

/// Root of fwii.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FwiiConfig {
    #[serde(default)]
    pub duration: DurationSection,
    #[serde(default)]
    pub indicator: IndicatorSection,
    #[serde(default)]
    pub baseline: BaselineSection,
    #[serde(default, rename = "warning_area")]
    pub warning_areas: Vec<WarningArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DurationSection {
    pub max_gap_hours: Option<f64>,
    #[serde(default)]
    pub default_hours: PartialLevelTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorSection {
    pub baseline_year: Option<i32>,
    /// Refuse to establish a baseline from any year but `baseline_year`.
    #[serde(default)]
    pub strict_baseline: bool,
    pub fluvial_weight: Option<f64>,
    pub coastal_weight: Option<f64>,
    #[serde(default)]
    pub severity_weights: PartialLevelTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineSection {
    pub path: Option<PathBuf>,
}

/// A Flood Warning Area in the configured region.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarningArea {
    pub fwd_code: String,
    #[serde(default)]
    pub name: String,
    /// Coastal (tidal) vs fluvial; omit when unknown.
    pub is_tidal: Option<bool>,
}

/// Per-level values where each level may be omitted.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialLevelTable {
    pub severe: Option<f64>,
    pub warning: Option<f64>,
    pub alert: Option<f64>,
    pub no_longer_in_force: Option<f64>,
}

impl PartialLevelTable {
    /// Fills omitted levels from `defaults` and validates the result.
    pub fn resolve(&self, defaults: &LevelTable, what: &str) -> Result<LevelTable> {
        let table = LevelTable {
            severe: self.severe.unwrap_or(defaults.severe),
            warning: self.warning.unwrap_or(defaults.warning),
            alert: self.alert.unwrap_or(defaults.alert),
            no_longer_in_force: self.no_longer_in_force.unwrap_or(defaults.no_longer_in_force),
        };
        validate_level_table(&table, what)?;
        Ok(table)
    }
}

// ============================================================================
// Level table helpers
// ============================================================================

/// Every level must be finite and non-negative.
pub(crate) fn validate_level_table(table: &LevelTable, what: &str) -> Result<()> {
    for (level, value) in table.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(FwiiError::InvalidConfig(format!(
                "{}: level {} must be a finite, non-negative number (got {})",
                what,
                level.level(),
                value
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Resolved accessors
// ============================================================================

impl FwiiConfig {
    pub fn default_durations(&self) -> Result<LevelTable> {
        self.duration.default_hours.resolve(&DEFAULT_DURATIONS, "duration.default_hours")
    }

    pub fn max_gap_hours(&self) -> f64 {
        self.duration.max_gap_hours.unwrap_or(DEFAULT_MAX_GAP_HOURS)
    }

    pub fn severity_weights(&self) -> Result<LevelTable> {
        self.indicator
            .severity_weights
            .resolve(&DEFAULT_SEVERITY_WEIGHTS, "indicator.severity_weights")
    }

    pub fn baseline_year(&self) -> i32 {
        self.indicator.baseline_year.unwrap_or(DEFAULT_BASELINE_YEAR)
    }

    pub fn fluvial_weight(&self) -> f64 {
        self.indicator.fluvial_weight.unwrap_or(DEFAULT_FLUVIAL_WEIGHT)
    }

    pub fn coastal_weight(&self) -> f64 {
        self.indicator.coastal_weight.unwrap_or(DEFAULT_COASTAL_WEIGHT)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.baseline
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINE_PATH))
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<FwiiConfig> {
    Ok(toml::from_str(contents)?)
}

/// Loads configuration from a file.
///
/// A missing file is not an error: every setting has a default and the
/// region registry is simply empty.
pub fn load_config(path: impl AsRef<Path>) -> Result<FwiiConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!("{} not found, using built-in defaults", path.display());
        return Ok(FwiiConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::info!(
        "Loaded {} ({} warning areas)",
        path.display(),
        config.warning_areas.len()
    );
    Ok(config)
}
