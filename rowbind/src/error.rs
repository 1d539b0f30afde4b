//! Error types for the row binding pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - tabular source errors (I/O, encoding, malformed CSV)
//! - [`ConversionError`] - a cell could not be coerced to a field kind
//! - [`BindError`] - a row could not be bound to an intermediate record
//! - [`RowFailure`] - any row-scoped failure (bind, transform, validation)
//! - [`ValidationError`] - a payload broke a declared constraint
//! - [`ConfigError`] - invalid batch configuration
//! - [`PipelineError`] - fatal, batch-level errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::fmt;

use thiserror::Error;

use crate::binding::FieldKind;

// =============================================================================
// Tabular Source Errors
// =============================================================================

/// Errors while reading the tabular source.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the byte content.
    #[error("Failed to decode content as {encoding}: {message}")]
    EncodingError { encoding: String, message: String },

    /// The delimiter is not a single ASCII character.
    #[error("Invalid delimiter: '{0}' is not ASCII")]
    InvalidDelimiter(char),

    /// Malformed CSV syntax.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Errors while converting one cell into a typed value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The cell text is not a valid literal for the requested kind.
    #[error("cannot parse '{value}' as {kind}: {reason}")]
    InvalidValue {
        value: String,
        kind: FieldKind,
        reason: String,
    },

    /// The requested kind is not one the converter knows.
    #[error("unsupported field kind: {0}")]
    UnsupportedKind(String),
}

impl ConversionError {
    pub(crate) fn invalid(value: &str, kind: FieldKind, reason: impl fmt::Display) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Binding Errors
// =============================================================================

/// Errors while binding a row to an intermediate record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The field's column is absent from the header, or the row is too short.
    #[error("column not found: {tag}")]
    ColumnNotFound { field: String, tag: String },

    /// The cell under the field's column failed conversion.
    #[error("field '{field}' (column '{column}'): {source}")]
    FieldConversion {
        field: String,
        column: String,
        source: ConversionError,
    },
}

impl BindError {
    /// Name of the record field that failed.
    pub fn field(&self) -> &str {
        match self {
            Self::ColumnNotFound { field, .. } | Self::FieldConversion { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors while validating a domain payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field broke a named rule.
    #[error("Invalid value for field '{field}': failed '{rule}' rule")]
    InvalidValue { field: String, rule: String },

    /// JSON Schema validation failed.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },
}

impl ValidationError {
    /// Field the failure is attached to, when the rule names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField(field) | Self::InvalidValue { field, .. } => Some(field),
            Self::SchemaError { .. } => None,
        }
    }

    /// Name of the rule that failed.
    pub fn rule(&self) -> &str {
        match self {
            Self::MissingField(_) => "required",
            Self::InvalidValue { rule, .. } => rule,
            Self::SchemaError { .. } => "schema",
        }
    }
}

// =============================================================================
// Row Failures
// =============================================================================

/// A row-scoped failure, tagged with the stage that produced it.
///
/// Validation failures keep the constructed payload so callers can still
/// inspect what the row turned into.
#[derive(Debug)]
pub enum RowFailure<P> {
    /// Binding the row to the intermediate record failed.
    Bind(BindError),
    /// The caller-supplied intermediate to payload conversion failed.
    Transform(Box<dyn std::error::Error + Send + Sync>),
    /// The payload was built but broke a constraint.
    Validation { payload: P, error: ValidationError },
}

impl<P> fmt::Display for RowFailure<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(err) => write!(f, "{err}"),
            Self::Transform(err) => write!(f, "{err}"),
            Self::Validation { error, .. } => write!(f, "INVALID_PAYLOAD_ROW_DATA: {error}"),
        }
    }
}

impl<P: fmt::Debug> std::error::Error for RowFailure<P> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(err) => Some(err),
            Self::Transform(err) => Some(err.as_ref()),
            Self::Validation { error, .. } => Some(error),
        }
    }
}

impl<P> From<BindError> for RowFailure<P> {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading batch options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option has a value outside its accepted set.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// Failed to read a config file.
    #[error("Config IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Config file is not valid JSON for the options shape.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Fatal errors that stop a whole batch.
///
/// Row-scoped failures never surface here; they are collected as
/// [`crate::batch::RowError`] values in the batch result.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The tabular source could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// The header row is missing or empty and the batch is set to abort.
    #[error("Header row is missing or empty")]
    EmptyHeader,

    /// Batch options are invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A record or JSON schema could not be loaded.
    #[error("Schema error: {0}")]
    Schema(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for tabular source operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for cell conversions.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Result type for row binding.
pub type BindResult<T> = Result<T, BindError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
