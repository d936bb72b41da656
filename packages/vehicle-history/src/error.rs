//! Typed errors for the vehicle history core.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Expected "no usable
//! data" conditions are never errors: detection returns `None` and parsers
//! report `success = false` in their [`ParseResult`](crate::parsers::ParseResult).
//! The enums here are reserved for caller-contract violations.

use thiserror::Error;

/// Errors raised by the merge engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Merge was invoked with zero source reports.
    #[error("Cannot merge empty source list")]
    EmptySourceList,
}

/// Errors raised while loading configuration overrides.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// A value parsed but is outside its allowed range.
    #[error("{key} out of range: {reason}")]
    OutOfRange { key: String, reason: String },
}

/// Result type alias for merge operations.
pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
