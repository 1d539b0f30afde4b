//! Cell to scalar conversion.
//!
//! A closed set of target kinds ([`FieldKind`]) with one converter per kind.
//! Cells are never trimmed and empty cells get no special treatment: `""`
//! only converts to a string.
//!
//! # Accepted literals
//!
//! | Kind   | Accepted text |
//! |--------|---------------|
//! | bool   | `1 t T true TRUE True` / `0 f F false FALSE False` |
//! | int    | base-10, optional sign, no surrounding whitespace |
//! | float  | decimal or exponent notation, `inf`, `NaN` |
//! | string | anything |

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConversionError, ConversionResult};

/// Literals accepted as `true`.
pub const TRUE_LITERALS: &[&str] = &["1", "t", "T", "true", "TRUE", "True"];

/// Literals accepted as `false`.
pub const FALSE_LITERALS: &[&str] = &["0", "f", "F", "false", "FALSE", "False"];

/// Target kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    String,
}

impl FieldKind {
    /// All supported kinds.
    pub const ALL: [FieldKind; 4] = [Self::Bool, Self::Int, Self::Float, Self::String];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" => Ok(Self::Int),
            "float" | "double" | "number" => Ok(Self::Float),
            "string" | "str" | "text" => Ok(Self::String),
            _ => Err(ConversionError::UnsupportedKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for FieldKind {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A converted cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Int(_) => FieldKind::Int,
            Self::Float(_) => FieldKind::Float,
            Self::String(_) => FieldKind::String,
        }
    }

    /// JSON form. `NaN` and infinities have none and fail.
    pub fn into_json(self) -> ConversionResult<Value> {
        match self {
            Self::Bool(b) => Ok(Value::Bool(b)),
            Self::Int(i) => Ok(Value::from(i)),
            Self::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| {
                    ConversionError::invalid(&f.to_string(), FieldKind::Float, "not representable in JSON")
                }),
            Self::String(s) => Ok(Value::String(s)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Convert one cell into a value of the given kind.
pub fn convert(cell: &str, kind: FieldKind) -> ConversionResult<FieldValue> {
    match kind {
        FieldKind::Bool => parse_bool(cell).map(FieldValue::Bool),
        FieldKind::Int => parse_int::<i64>(cell).map(FieldValue::Int),
        FieldKind::Float => parse_float::<f64>(cell).map(FieldValue::Float),
        FieldKind::String => Ok(FieldValue::String(cell.to_string())),
    }
}

/// Convert one cell, naming the kind as text.
///
/// Unknown kind names fail with [`ConversionError::UnsupportedKind`].
pub fn convert_named(cell: &str, kind: &str) -> ConversionResult<FieldValue> {
    convert(cell, kind.parse()?)
}

pub fn parse_bool(cell: &str) -> ConversionResult<bool> {
    if TRUE_LITERALS.contains(&cell) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&cell) {
        Ok(false)
    } else {
        Err(ConversionError::invalid(
            cell,
            FieldKind::Bool,
            "expected one of 1, t, T, true, TRUE, True, 0, f, F, false, FALSE, False",
        ))
    }
}

pub fn parse_int<T>(cell: &str) -> ConversionResult<T>
where
    T: FromStr<Err = ParseIntError>,
{
    cell.parse::<T>()
        .map_err(|e| ConversionError::invalid(cell, FieldKind::Int, e))
}

pub fn parse_float<T>(cell: &str) -> ConversionResult<T>
where
    T: FromStr<Err = ParseFloatError>,
{
    cell.parse::<T>()
        .map_err(|e| ConversionError::invalid(cell, FieldKind::Float, e))
}

/// A Rust type a record field can hold.
///
/// Each implementation pins the field to one [`FieldKind`] at compile time,
/// so a bound record can never receive a value of the wrong kind.
pub trait CellType: Sized {
    const KIND: FieldKind;

    fn parse_cell(cell: &str) -> ConversionResult<Self>;
}

impl CellType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn parse_cell(cell: &str) -> ConversionResult<Self> {
        parse_bool(cell)
    }
}

impl CellType for String {
    const KIND: FieldKind = FieldKind::String;

    fn parse_cell(cell: &str) -> ConversionResult<Self> {
        Ok(cell.to_string())
    }
}

macro_rules! int_cell_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CellType for $ty {
                const KIND: FieldKind = FieldKind::Int;

                fn parse_cell(cell: &str) -> ConversionResult<Self> {
                    parse_int(cell)
                }
            }
        )+
    };
}

macro_rules! float_cell_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl CellType for $ty {
                const KIND: FieldKind = FieldKind::Float;

                fn parse_cell(cell: &str) -> ConversionResult<Self> {
                    parse_float(cell)
                }
            }
        )+
    };
}

int_cell_types!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_cell_types!(f32, f64);
