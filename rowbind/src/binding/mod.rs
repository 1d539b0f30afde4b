//! Row to intermediate record binding.
//!
//! - `columns`: header index and column to cell resolution
//! - `convert`: cell text to typed scalar conversion
//! - `tag`: column tag grammar
//! - `record`: compile-time record shapes and the `bind_record!` macro
//! - `dynamic`: record shapes described at runtime (JSON)
//!
//! ## Usage Flow
//!
//! ```text
//! header → ColumnIndex ─┐
//!                row ───┴→ RecordBinder::bind_row → intermediate record
//! ```

pub mod columns;
pub mod convert;
pub mod dynamic;
pub mod record;
pub mod tag;

pub use columns::{map_columns, ColumnIndex};
pub use convert::{
    convert, convert_named, parse_bool, parse_float, parse_int, CellType, FieldKind, FieldValue,
    FALSE_LITERALS, TRUE_LITERALS,
};
pub use dynamic::{DynamicRecord, RecordSchema, SchemaField};
pub use record::{bind, bind_indexed, BindRecord, Field, RecordBinder, TypedBinder};
pub use tag::{tag_column, ColumnTag, TagModifier};
