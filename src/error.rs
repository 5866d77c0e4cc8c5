//! Error taxonomy for trend computation and paradox detection
//!
//! Configuration and consistency errors are raised immediately. Empty
//! results and degenerate (NaN) statistics are NOT errors: they surface as
//! ordinary, possibly empty, result data.

use thiserror::Error;

/// Errors raised by the detection engine
#[derive(Error, Debug)]
pub enum SpError {
    #[error("Unknown trend type: '{0}'")]
    UnknownTrendType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    #[error("Column '{column}' has the wrong type: expected {expected}")]
    ColumnType { column: String, expected: String },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Pair alignment mismatch for {group_feat}={subgroup}: expected {expected} pairs, got {actual}"
    )]
    MisalignedPairs {
        group_feat: String,
        subgroup: String,
        expected: usize,
        actual: usize,
    },

    #[error("Aggregate trend for ({feat1}, {feat2}) of type '{trend_type}' computed twice")]
    DuplicateAggregate {
        trend_type: String,
        feat1: String,
        feat2: String,
    },

    #[error("Trend '{trend_type}' paired '{feature}' with itself")]
    SelfPair { trend_type: String, feature: String },

    #[error("Feature pair appears in both orderings: ({feat1}, {feat2}) and ({feat2}, {feat1})")]
    ReversedPairOrdering { feat1: String, feat2: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coarse classification of [`SpError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller asked for something that is not registered or not valid
    Configuration,
    /// An alignment or pair-ordering invariant was violated
    DataConsistency,
    /// Dataset or configuration input could not be read
    Input,
}

impl SpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpError::UnknownTrendType(_) | SpError::InvalidConfig(_) => ErrorKind::Configuration,
            SpError::MisalignedPairs { .. }
            | SpError::DuplicateAggregate { .. }
            | SpError::SelfPair { .. }
            | SpError::ReversedPairOrdering { .. } => ErrorKind::DataConsistency,
            SpError::UnknownColumn(_)
            | SpError::ColumnType { .. }
            | SpError::ColumnLength { .. }
            | SpError::Io(_)
            | SpError::Json(_)
            | SpError::Toml(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpError>;
