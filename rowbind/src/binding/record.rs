//! Binding rows to intermediate records.
//!
//! An intermediate record shape describes its fields once, at compile time,
//! through [`BindRecord::FIELDS`]. Each [`Field`] carries the column tag, the
//! target kind and a typed setter, so binding is a walk over a static table
//! with no runtime type inspection.
//!
//! Binding is fail-fast per row: the first field that cannot be resolved or
//! converted aborts the row and the remaining fields are not looked at.

use std::fmt;
use std::marker::PhantomData;

use super::columns::ColumnIndex;
use super::convert::FieldKind;
use super::tag::{tag_column, ColumnTag};
use crate::error::{BindError, BindResult, ConversionResult};

/// Static description of one record field.
pub struct Field<R> {
    /// Rust field name.
    pub name: &'static str,
    /// Raw column tag, `columnName[,modifier...]`.
    pub tag: &'static str,
    pub kind: FieldKind,
    /// Converts the cell and stores it in the record.
    pub set: fn(&mut R, &str) -> ConversionResult<()>,
}

impl<R> Field<R> {
    /// Column name this field reads.
    pub fn column(&self) -> &'static str {
        tag_column(self.tag)
    }

    pub fn column_tag(&self) -> ColumnTag {
        ColumnTag::parse(self.tag)
    }
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An intermediate record shape that can be bound from a row.
///
/// Usually generated with [`bind_record!`](crate::bind_record); it can also
/// be implemented by hand.
pub trait BindRecord: Sized + 'static {
    /// Fields in binding order.
    const FIELDS: &'static [Field<Self>];

    /// A fresh record that binding fills field by field.
    fn blank() -> Self;
}

/// Bind one row against a prepared header index.
pub fn bind_indexed<R, S>(index: &ColumnIndex, row: &[S]) -> BindResult<R>
where
    R: BindRecord,
    S: AsRef<str>,
{
    let mut record = R::blank();
    for field in R::FIELDS {
        let column = field.column();
        let cell = index
            .cell(row, column)
            .ok_or_else(|| BindError::ColumnNotFound {
                field: field.name.to_string(),
                tag: field.tag.to_string(),
            })?;
        (field.set)(&mut record, cell).map_err(|source| BindError::FieldConversion {
            field: field.name.to_string(),
            column: column.to_string(),
            source,
        })?;
    }
    Ok(record)
}

/// Bind one row given its header.
pub fn bind<R, H, S>(header: &[H], row: &[S]) -> BindResult<R>
where
    R: BindRecord,
    H: AsRef<str>,
    S: AsRef<str>,
{
    bind_indexed(&ColumnIndex::new(header), row)
}

/// Something that turns a row into an intermediate record.
///
/// [`TypedBinder`] covers compile-time shapes; [`crate::binding::RecordSchema`]
/// covers shapes described at runtime.
pub trait RecordBinder {
    type Record;

    fn bind_row<S: AsRef<str>>(&self, index: &ColumnIndex, row: &[S]) -> BindResult<Self::Record>;
}

impl<B: RecordBinder + ?Sized> RecordBinder for &B {
    type Record = B::Record;

    fn bind_row<S: AsRef<str>>(&self, index: &ColumnIndex, row: &[S]) -> BindResult<B::Record> {
        (**self).bind_row(index, row)
    }
}

/// Binder for a [`BindRecord`] type.
pub struct TypedBinder<R> {
    _record: PhantomData<fn() -> R>,
}

impl<R> TypedBinder<R> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<R> Default for TypedBinder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for TypedBinder<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for TypedBinder<R> {}

impl<R> fmt::Debug for TypedBinder<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedBinder<{}>", std::any::type_name::<R>())
    }
}

impl<R: BindRecord> RecordBinder for TypedBinder<R> {
    type Record = R;

    fn bind_row<S: AsRef<str>>(&self, index: &ColumnIndex, row: &[S]) -> BindResult<R> {
        bind_indexed(index, row)
    }
}

/// Declare an intermediate record and derive its [`BindRecord`] impl.
///
/// Every field takes a `#[column = "tag"]` attribute; its type must
/// implement [`CellType`](crate::binding::CellType). Doc comments may come
/// before `#[column]`; any other field attribute goes after it.
///
/// ```rust
/// rowbind::bind_record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Person {
///         #[column = "id,required"]
///         pub id: i64,
///         #[column = "name"]
///         pub name: String,
///     }
/// }
///
/// let person: Person = rowbind::binding::bind(&["id", "name"], &["1", "John Doe"]).unwrap();
/// assert_eq!(person, Person { id: 1, name: "John Doe".into() });
/// ```
#[macro_export]
macro_rules! bind_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                #[column = $tag:literal]
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::binding::BindRecord for $name {
            const FIELDS: &'static [$crate::binding::Field<Self>] = &[
                $(
                    $crate::binding::Field {
                        name: ::core::stringify!($field),
                        tag: $tag,
                        kind: <$ty as $crate::binding::CellType>::KIND,
                        set: |record: &mut $name, cell: &str| {
                            record.$field = <$ty as $crate::binding::CellType>::parse_cell(cell)?;
                            ::core::result::Result::Ok(())
                        },
                    },
                )*
            ];

            fn blank() -> Self {
                Self {
                    $( $field: ::core::default::Default::default(), )*
                }
            }
        }
    };
}
