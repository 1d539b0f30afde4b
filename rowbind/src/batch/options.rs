//! Batch options and their layered loading.
//!
//! Defaults → JSON config file → environment (`.env` honoured by the CLI)
//! → command-line flags.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

pub const ENV_EMPTY_HEADER: &str = "ROWBIND_EMPTY_HEADER";
pub const ENV_SKIP_VALIDATION: &str = "ROWBIND_SKIP_VALIDATION";
pub const ENV_DELIMITER: &str = "ROWBIND_DELIMITER";
pub const ENV_ERROR_PREVIEW: &str = "ROWBIND_ERROR_PREVIEW";

/// What a batch does when its header row is missing or empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyHeaderPolicy {
    /// Record one `CSV_INVALID_COLUMNS_COUNT` row error and return normally.
    #[default]
    Record,
    /// Fail the batch with [`crate::PipelineError::EmptyHeader`].
    Abort,
}

impl FromStr for EmptyHeaderPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "abort" => Ok(Self::Abort),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_EMPTY_HEADER.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Handling of a missing/empty header row
    pub empty_header: EmptyHeaderPolicy,

    /// Skip the validation stage
    pub skip_validation: bool,

    /// Source delimiter (auto-detect when unset)
    pub delimiter: Option<char>,

    /// Number of row errors echoed to the log
    pub error_preview: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            empty_header: EmptyHeaderPolicy::Record,
            skip_validation: false,
            delimiter: None,
            error_preview: 3,
        }
    }
}

impl BatchOptions {
    /// Load options from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `ROWBIND_*` variables from the process environment.
    pub fn with_env(self) -> ConfigResult<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Apply `ROWBIND_*` variables from any lookup.
    pub fn with_vars<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_EMPTY_HEADER) {
            self.empty_header = value.parse()?;
        }
        if let Some(value) = lookup(ENV_SKIP_VALIDATION) {
            self.skip_validation = parse_flag(ENV_SKIP_VALIDATION, &value)?;
        }
        if let Some(value) = lookup(ENV_DELIMITER) {
            self.delimiter = Some(parse_delimiter(&value)?);
        }
        if let Some(value) = lookup(ENV_ERROR_PREVIEW) {
            self.error_preview = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_ERROR_PREVIEW.to_string(),
                value: value.clone(),
            })?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// `\t` and `tab` name the tab character; anything else must be one ASCII char.
pub fn parse_delimiter(value: &str) -> ConfigResult<char> {
    match value {
        "\\t" | "tab" | "TAB" => return Ok('\t'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_DELIMITER.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_options() {
        let opts = BatchOptions::default();
        assert_eq!(opts.empty_header, EmptyHeaderPolicy::Record);
        assert!(!opts.skip_validation);
        assert_eq!(opts.delimiter, None);
        assert_eq!(opts.error_preview, 3);
    }

    #[test]
    fn test_env_overrides() {
        let opts = BatchOptions::default()
            .with_vars(vars(&[
                (ENV_EMPTY_HEADER, "Abort"),
                (ENV_SKIP_VALIDATION, "yes"),
                (ENV_DELIMITER, "\\t"),
                (ENV_ERROR_PREVIEW, "10"),
            ]))
            .unwrap();
        assert_eq!(opts.empty_header, EmptyHeaderPolicy::Abort);
        assert!(opts.skip_validation);
        assert_eq!(opts.delimiter, Some('\t'));
        assert_eq!(opts.error_preview, 10);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = BatchOptions::default()
            .with_vars(vars(&[(ENV_EMPTY_HEADER, "sometimes")]))
            .unwrap_err();
        assert!(err.to_string().contains("sometimes"));

        assert!(BatchOptions::default()
            .with_vars(vars(&[(ENV_DELIMITER, ";;")]))
            .is_err());
    }

    #[test]
    fn test_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "empty_header": "abort", "delimiter": ";" }}"#).unwrap();

        let opts = BatchOptions::from_json_file(file.path()).unwrap();
        assert_eq!(opts.empty_header, EmptyHeaderPolicy::Abort);
        assert_eq!(opts.delimiter, Some(';'));
        assert_eq!(opts.error_preview, 3);
    }
}
