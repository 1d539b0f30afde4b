//! High-level pipeline API: CSV source to bound payloads.
//!
//! Combines the tabular source (encoding and delimiter detection, record
//! splitting) with a batch run.
//!
//! # Example
//!
//! ```rust,ignore
//! use rowbind::batch::{process_csv_file, BatchOptions};
//! use rowbind::binding::RecordSchema;
//! use rowbind::validation::NoValidation;
//! use std::path::Path;
//!
//! let schema = RecordSchema::from_file(Path::new("fields.json"))?;
//! let run = process_csv_file(
//!     Path::new("people.csv"),
//!     &schema,
//!     NoValidation,
//!     &BatchOptions::default(),
//! )?;
//! println!("Bound {} payloads", run.batch.payloads.len());
//! ```

use std::path::Path;

use serde::Serialize;

use crate::batch::options::BatchOptions;
use crate::batch::processor::process;
use crate::batch::result::BatchResult;
use crate::binding::RecordBinder;
use crate::error::PipelineError;
use crate::logs::{log_info, log_info_indent, log_success};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};
use crate::transform::{PayloadOf, ToPayload};
use crate::validation::Validator;

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for CsvInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.headers().to_vec(),
            row_count: parsed.row_count(),
        }
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult<P> {
    /// Payloads and row errors
    pub batch: BatchResult<P>,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,
}

/// Bind every row of a CSV file.
///
/// Source failures (I/O, encoding, malformed CSV) abort before any row is
/// processed. Row failures land in `batch.errors`.
pub fn process_csv_file<B, V>(
    path: &Path,
    binder: B,
    validator: V,
    options: &BatchOptions,
) -> Result<PipelineResult<PayloadOf<B>>, PipelineError>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>>,
{
    log_info(format!("📖 Reading CSV file: {}", path.display()));
    let parsed = parse_csv_file_auto(path, options.delimiter)?;
    process_parsed(parsed, binder, validator, options)
}

/// Same as [`process_csv_file`] but accepts raw bytes.
pub fn process_bytes<B, V>(
    bytes: &[u8],
    binder: B,
    validator: V,
    options: &BatchOptions,
) -> Result<PipelineResult<PayloadOf<B>>, PipelineError>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>>,
{
    let parsed = parse_bytes_auto(bytes, options.delimiter)?;
    process_parsed(parsed, binder, validator, options)
}

fn process_parsed<B, V>(
    parsed: ParseResult,
    binder: B,
    validator: V,
    options: &BatchOptions,
) -> Result<PipelineResult<PayloadOf<B>>, PipelineError>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>>,
{
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!(
        "Detected separator: '{}'",
        format_delimiter(parsed.delimiter)
    ));
    log_success(format!("Read {} rows", parsed.row_count()));

    let csv_info = CsvInfo::from(&parsed);

    log_info(format!("📋 CSV has {} columns:", csv_info.headers.len()));
    for (i, col) in csv_info.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    if options.skip_validation {
        log_info("(validation skipped)");
    }
    log_info("⚙️  Binding rows...");
    let batch = process(binder, &parsed.records, validator, options)?;

    Ok(PipelineResult { batch, csv_info })
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
