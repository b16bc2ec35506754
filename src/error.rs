//! Error types for feature computation.
//!
//! All fallible operations in paddock return [`FeatureError`]. The variants fall into
//! three groups:
//!
//! - **Degrading errors**: [`FeatureError::DataUnavailable`], [`FeatureError::MissingJoinKey`],
//!   [`FeatureError::MissingValue`] and [`FeatureError::Timeout`]. These never abort a batch;
//!   the assembler turns them into null fields and the window builder turns them into a
//!   shorter window.
//! - **Startup errors**: [`FeatureError::Configuration`], raised once while loading the
//!   configuration, before any session is touched.
//! - **Collaborator errors**: [`FeatureError::Parse`], [`FeatureError::File`] and
//!   [`FeatureError::Sink`], raised by the archive provider and the persistence sink.
//!
//! ```rust
//! use paddock::{FeatureError, Table};
//!
//! let error = FeatureError::missing_join_key("44", Table::Results);
//! assert!(error.is_degrading());
//! assert!(!error.is_retryable());
//! ```

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for feature operations.
pub type Result<T, E = FeatureError> = std::result::Result<T, E>;

/// Session table an extractor reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Results,
    Laps,
    Weather,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Results => f.write_str("results"),
            Table::Laps => f.write_str("laps"),
            Table::Weather => f.write_str("weather"),
        }
    }
}

/// Main error type for feature operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FeatureError {
    #[error("Session data unavailable: {reason}")]
    DataUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Driver {driver} not found in {table} table")]
    MissingJoinKey { driver: String, table: Table },

    #[error("Driver {driver} has no {column} value")]
    MissingValue { driver: String, column: &'static str },

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Provider call timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Feature sink failed: {reason}")]
    Sink {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FeatureError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            FeatureError::DataUnavailable { .. } => true,
            FeatureError::Timeout { .. } => true,
            FeatureError::Sink { .. } => true,
            FeatureError::MissingJoinKey { .. } => false,
            FeatureError::MissingValue { .. } => false,
            FeatureError::Configuration { .. } => false,
            FeatureError::Parse { .. } => false,
            FeatureError::File { .. } => false,
        }
    }

    /// Returns whether this error degrades a field or window entry to null
    /// instead of aborting processing.
    pub fn is_degrading(&self) -> bool {
        matches!(
            self,
            FeatureError::DataUnavailable { .. }
                | FeatureError::MissingJoinKey { .. }
                | FeatureError::MissingValue { .. }
                | FeatureError::Timeout { .. }
        )
    }

    /// Helper constructor for unavailable session data.
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        FeatureError::DataUnavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for unavailable session data with source.
    pub fn data_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        FeatureError::DataUnavailable { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for a table that has not been hydrated.
    pub fn table_unavailable(table: Table) -> Self {
        FeatureError::data_unavailable(format!("{} table not loaded", table))
    }

    /// Helper constructor for a driver absent from a table.
    pub fn missing_join_key(driver: impl Into<String>, table: Table) -> Self {
        FeatureError::MissingJoinKey { driver: driver.into(), table }
    }

    /// Helper constructor for a driver row with an empty column.
    pub fn missing_value(driver: impl Into<String>, column: &'static str) -> Self {
        FeatureError::MissingValue { driver: driver.into(), column }
    }

    /// Helper constructor for configuration errors.
    pub fn configuration(reason: impl Into<String>) -> Self {
        FeatureError::Configuration { reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        FeatureError::File { path, source }
    }

    /// Helper constructor for sink errors.
    pub fn sink_failed(reason: impl Into<String>) -> Self {
        FeatureError::Sink { reason: reason.into(), source: None }
    }
}

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        FeatureError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for FeatureError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        FeatureError::Parse { context: "YAML deserialization".to_string(), details: err.to_string() }
    }
}
