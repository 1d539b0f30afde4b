//! Column tags: `columnName[,modifier[,modifier...]]`.
//!
//! Only the column name takes part in binding. Modifiers are parsed and
//! exposed so payload validators can use them, but the binder ignores them:
//! a field tagged `required` whose cell is empty still binds (and fails only
//! if the empty text does not convert).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A modifier following the column name in a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagModifier {
    Required,
    OmitEmpty,
    /// Any other token, kept verbatim.
    Other(String),
}

impl TagModifier {
    fn parse(token: &str) -> Self {
        match token {
            "required" => Self::Required,
            "omitempty" => Self::OmitEmpty,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::OmitEmpty => "omitempty",
            Self::Other(token) => token,
        }
    }
}

/// Column name of a raw tag: everything before the first comma, untrimmed.
pub fn tag_column(tag: &str) -> &str {
    tag.split_once(',').map_or(tag, |(column, _)| column)
}

/// A parsed column tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ColumnTag {
    column: String,
    modifiers: Vec<TagModifier>,
}

impl ColumnTag {
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.split(',');
        let column = parts.next().unwrap_or_default().to_string();
        let modifiers = parts
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(TagModifier::parse)
            .collect();
        Self { column, modifiers }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn modifiers(&self) -> &[TagModifier] {
        &self.modifiers
    }

    pub fn is_required(&self) -> bool {
        self.modifiers.contains(&TagModifier::Required)
    }

    pub fn omit_empty(&self) -> bool {
        self.modifiers.contains(&TagModifier::OmitEmpty)
    }
}

impl fmt::Display for ColumnTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column)?;
        for modifier in &self.modifiers {
            write!(f, ",{}", modifier.as_str())?;
        }
        Ok(())
    }
}

impl From<String> for ColumnTag {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<&str> for ColumnTag {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl From<ColumnTag> for String {
    fn from(tag: ColumnTag) -> Self {
        tag.to_string()
    }
}
