//! Record shapes described at runtime.
//!
//! A [`RecordSchema`] is the JSON counterpart of a `bind_record!` struct:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "id",   "column": "ID,required", "kind": "int" },
//!     { "name": "name", "column": "Name",        "kind": "string" }
//!   ]
//! }
//! ```
//!
//! Rows bind into a [`DynamicRecord`], a JSON object keyed by field name.

use std::convert::Infallible;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::columns::ColumnIndex;
use super::convert::{convert, FieldKind, FieldValue};
use super::record::RecordBinder;
use super::tag::ColumnTag;
use crate::error::{BindError, BindResult, PipelineError};
use crate::transform::ToPayload;

/// One field of a runtime schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Output key.
    pub name: String,
    /// Column tag, `columnName[,modifier...]`.
    pub column: ColumnTag,
    pub kind: FieldKind,
}

/// Runtime description of an intermediate record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub fields: Vec<SchemaField>,
}

impl RecordSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style).
    pub fn field(mut self, name: impl Into<String>, column: &str, kind: FieldKind) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            column: ColumnTag::parse(column),
            kind,
        });
        self
    }

    /// Parse a schema from JSON. Unknown kinds are rejected here.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let schema: Self = serde_json::from_str(json)?;
        if schema.fields.is_empty() {
            return Err(PipelineError::Schema("record schema declares no fields".into()));
        }
        Ok(schema)
    }

    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fields whose tag carries `required`.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.column.is_required())
            .map(|f| f.name.as_str())
    }
}

/// A row bound through a [`RecordSchema`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    pub values: Map<String, Value>,
}

impl ToPayload for DynamicRecord {
    type Payload = Value;
    type Error = Infallible;

    fn to_payload(self) -> Result<Value, Infallible> {
        Ok(Value::Object(self.values))
    }
}

impl RecordBinder for RecordSchema {
    type Record = DynamicRecord;

    fn bind_row<S: AsRef<str>>(&self, index: &ColumnIndex, row: &[S]) -> BindResult<DynamicRecord> {
        let mut record = DynamicRecord::default();
        for field in &self.fields {
            let column = field.column.column();
            let cell = index
                .cell(row, column)
                .ok_or_else(|| BindError::ColumnNotFound {
                    field: field.name.clone(),
                    tag: field.column.to_string(),
                })?;
            let value = convert(cell, field.kind)
                .and_then(FieldValue::into_json)
                .map_err(|source| BindError::FieldConversion {
                    field: field.name.clone(),
                    column: column.to_string(),
                    source,
                })?;
            record.values.insert(field.name.clone(), value);
        }
        Ok(record)
    }
}
