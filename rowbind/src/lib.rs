//! # Rowbind - typed row binding for tabular data
//!
//! Rowbind turns the rows of a CSV source into typed domain payloads. Each
//! row is bound to an intermediate record through column tags, converted to
//! a payload by caller code, and validated. Failing rows are collected with
//! enough context to diagnose them; the rest of the batch carries on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Binding   │────▶│  Transform  │────▶│  Validation │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (col tags)  │     │ (ToPayload) │     │ (rules/JSON)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                 │                   │                   │
//!                                                 └───────────────────┴───────────────────┘
//!                                                                     ▼
//!                                                  BatchResult { payloads, errors }
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rowbind::batch::{process, BatchOptions};
//! use rowbind::binding::TypedBinder;
//! use rowbind::transform::ToPayload;
//! use rowbind::validation::NoValidation;
//! use std::convert::Infallible;
//!
//! rowbind::bind_record! {
//!     pub struct PersonColumns {
//!         #[column = "id"]
//!         pub id: i64,
//!         #[column = "name"]
//!         pub name: String,
//!     }
//! }
//!
//! impl ToPayload for PersonColumns {
//!     type Payload = (i64, String);
//!     type Error = Infallible;
//!
//!     fn to_payload(self) -> Result<(i64, String), Infallible> {
//!         Ok((self.id, self.name))
//!     }
//! }
//!
//! let records = vec![vec!["id", "name"], vec!["1", "John Doe"], vec!["x", "Jane"]];
//! let result = process(
//!     TypedBinder::<PersonColumns>::new(),
//!     &records,
//!     NoValidation,
//!     &BatchOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.payloads, vec![(1, "John Doe".to_string())]);
//! assert_eq!(result.errors[0].row, "x, Jane");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`binding`] - Column index, cell conversion, record shapes
//! - [`transform`] - Intermediate record to payload
//! - [`validation`] - Payload rules and JSON Schema validation
//! - [`batch`] - Batch state machine, options and pipeline
//! - [`parser`] - CSV parsing with auto-detection
//! - [`logs`] - Log broadcasting

// Core modules
pub mod error;

// Binding
pub mod binding;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Batch
pub mod batch;

// Parsing
pub mod parser;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BindError, ConfigError, ConversionError, CsvError, PipelineError, RowFailure,
    ValidationError,
};

// =============================================================================
// Re-exports - Binding
// =============================================================================

pub use binding::{
    bind, convert, BindRecord, CellType, ColumnIndex, ColumnTag, DynamicRecord, Field,
    FieldKind, FieldValue, RecordBinder, RecordSchema, TypedBinder,
};

// =============================================================================
// Re-exports - Transform & Validation
// =============================================================================

pub use transform::{transform_csv_row, transform_row, ToPayload};
pub use validation::{required, NoValidation, RuleValidator, SchemaValidator, Validate, Validator};

// =============================================================================
// Re-exports - Batch
// =============================================================================

pub use batch::{
    process, process_bytes, process_csv_file, BatchOptions, BatchProcessor, BatchResult,
    EmptyHeaderPolicy, ErrorStage, PipelineResult, RowError, RowErrorKind,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{parse_bytes_auto, parse_csv_file_auto, parse_str, ParseResult};
