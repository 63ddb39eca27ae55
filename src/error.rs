use thiserror::Error;

/// Errors raised by duration inference, scoring, and baseline handling.
#[derive(Debug, Error)]
pub enum FwiiError {
    /// Normalization was requested for a non-baseline year but no baseline
    /// has been established. Run the baseline year first.
    #[error("no baseline scores available to normalize {year}; calculate the baseline year first")]
    MissingBaseline { year: i32 },

    #[error(
        "composite weights must sum to 1.0 (fluvial {fluvial} + coastal {coastal} = {})",
        .fluvial + .coastal
    )]
    InvalidWeights { fluvial: f64, coastal: f64 },

    /// A record in the input batch lacks a required field. The whole batch
    /// is rejected.
    #[error("invalid warning record #{index}: {field}")]
    InvalidInput { index: usize, field: String },

    #[error("configuration error: {0}")]
    InvalidConfig(String),

    /// A count or year does not fit the type it is stored as.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] postgres::Error),

    #[error(transparent)]
    DbConfig(#[from] crate::db::DbConfigError),
}

pub type Result<T> = std::result::Result<T, FwiiError>;
