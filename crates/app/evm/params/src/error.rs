//! Error types for the EVM parameter crate.

use thiserror::Error;

/// A parameter failed its validation rule.
///
/// Carries the store key of the offending field so that failures are
/// reproducible regardless of which other fields were set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter {key}: {reason}")]
pub struct ValidationError {
    /// Parameter store key of the failing field.
    pub key: &'static str,
    /// Human-readable reason reported by the field validator.
    pub reason: String,
}

impl ValidationError {
    pub fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Chain configuration consistency errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainConfigError {
    /// The EIP-150 hash is neither empty nor a 32-byte hex hash.
    #[error("invalid eip150 hash '{0}'")]
    InvalidEip150Hash(String),

    /// A fork is scheduled while an earlier mandatory fork is not.
    #[error("unsupported fork ordering: {missing} not enabled, but {enabled} enabled at block {at}")]
    MissingFork {
        missing: &'static str,
        enabled: &'static str,
        at: u64,
    },

    /// Two forks are scheduled out of order.
    #[error("unsupported fork ordering: {earlier} enabled at block {earlier_at}, but {later} enabled at block {later_at}")]
    OutOfOrder {
        earlier: &'static str,
        earlier_at: u64,
        later: &'static str,
        later_at: u64,
    },
}

/// Errors raised while reading, writing or migrating parameters in a store.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A value failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The stored bytes under `key` are not a valid parameter value.
    #[error("failed to decode parameter {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage.
    #[error("failed to encode parameter {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// An expected key is absent from the store.
    #[error("parameter {key} not found in store")]
    Missing { key: String },

    /// A governance change referenced a key that is not part of the set.
    #[error("unknown parameter key {0}")]
    UnknownKey(String),
}

/// Errors raised while loading genesis parameters from a file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error when loading the parameter file.
    #[error("failed to read params file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// YAML parsing error.
    #[error("failed to parse params file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    /// The parsed parameters are not a valid snapshot.
    #[error("params file '{path}' failed validation: {source}")]
    Validation {
        path: String,
        source: ValidationError,
    },
}
