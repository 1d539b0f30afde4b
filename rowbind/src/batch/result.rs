//! Batch output: accepted payloads plus per-row errors.

use serde::Serialize;

use crate::error::{BindError, RowFailure};

/// Separator used to join a row's cells for diagnostics.
pub const ROW_SEPARATOR: &str = ", ";

/// Coarse error category, serialized as the stable tag callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowErrorKind {
    /// The header row is missing or empty.
    #[serde(rename = "CSV_INVALID_COLUMNS_COUNT")]
    InvalidColumnsCount,
    /// The row failed binding, transformation or validation.
    #[serde(rename = "CSV_ERROR_SETTING_STRUCT_PAYLOAD")]
    BindOrTransformFailure,
}

impl RowErrorKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InvalidColumnsCount => "CSV_INVALID_COLUMNS_COUNT",
            Self::BindOrTransformFailure => "CSV_ERROR_SETTING_STRUCT_PAYLOAD",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidColumnsCount => "Invalid columns count",
            Self::BindOrTransformFailure => "Error generating payload",
        }
    }
}

/// Stage that produced a row error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    Structural,
    ColumnNotFound,
    FieldConversion,
    Transform,
    Validation,
}

impl ErrorStage {
    pub fn kind(&self) -> RowErrorKind {
        match self {
            Self::Structural => RowErrorKind::InvalidColumnsCount,
            _ => RowErrorKind::BindOrTransformFailure,
        }
    }
}

/// One failed row.
#[derive(Debug, Clone, Serialize)]
pub struct RowError<P> {
    pub error_message: String,
    #[serde(rename = "tag")]
    pub kind: RowErrorKind,
    pub stage: ErrorStage,
    /// Underlying error text.
    pub error: String,
    /// Cells joined with `", "`.
    pub row: String,
    /// 0-based data row index (the header is not counted).
    ///
    /// Always 0 for [`ErrorStage::Structural`], where no data row is involved;
    /// check `stage` before reading it.
    pub index: usize,
    /// Payload that was built before validation rejected it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
}

impl<P> RowError<P> {
    /// The batch-level error for a missing or empty header.
    ///
    /// `row` holds the header cells; `index` carries no meaning here.
    pub fn structural<S: AsRef<str>>(header: &[S]) -> Self {
        let kind = ErrorStage::Structural.kind();
        Self {
            error_message: kind.message().to_string(),
            kind,
            stage: ErrorStage::Structural,
            error: "header row is missing or empty".to_string(),
            row: join_row(header),
            index: 0,
            payload: None,
        }
    }

    /// Error record for a row that failed one of the per-row stages.
    pub fn from_failure<S: AsRef<str>>(index: usize, row: &[S], failure: RowFailure<P>) -> Self {
        let stage = match &failure {
            RowFailure::Bind(BindError::ColumnNotFound { .. }) => ErrorStage::ColumnNotFound,
            RowFailure::Bind(BindError::FieldConversion { .. }) => ErrorStage::FieldConversion,
            RowFailure::Transform(_) => ErrorStage::Transform,
            RowFailure::Validation { .. } => ErrorStage::Validation,
        };
        let error = failure.to_string();
        let payload = match failure {
            RowFailure::Validation { payload, .. } => Some(payload),
            _ => None,
        };
        let kind = stage.kind();
        Self {
            error_message: kind.message().to_string(),
            kind,
            stage,
            error,
            row: join_row(row),
            index,
            payload,
        }
    }
}

/// Join cells for diagnostics.
pub fn join_row<S: AsRef<str>>(row: &[S]) -> String {
    row.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(ROW_SEPARATOR)
}

/// Result of a batch: payloads and errors, each in input row order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<P> {
    pub payloads: Vec<P>,
    pub errors: Vec<RowError<P>>,
}

impl<P> BatchResult<P> {
    pub fn new() -> Self {
        Self {
            payloads: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no row failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Rows accounted for (accepted + failed, structural error included).
    pub fn total(&self) -> usize {
        self.payloads.len() + self.errors.len()
    }

    /// The structural error, if the header was missing or empty.
    pub fn structural_error(&self) -> Option<&RowError<P>> {
        self.errors
            .iter()
            .find(|e| e.kind == RowErrorKind::InvalidColumnsCount)
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        format!(
            "Bound: {} payloads, {} row errors",
            self.payloads.len(),
            self.errors.len()
        )
    }
}

impl<P> Default for BatchResult<P> {
    fn default() -> Self {
        Self::new()
    }
}
