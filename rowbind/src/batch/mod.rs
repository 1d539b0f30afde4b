//! Batch processing of a header plus rows.
//!
//! - `options`: batch options and their layered loading
//! - `processor`: the header/rows/done state machine
//! - `result`: payloads, row errors and their tags
//! - `pipeline`: CSV source to batch result

pub mod options;
pub mod pipeline;
pub mod processor;
pub mod result;

pub use options::{
    parse_delimiter, BatchOptions, EmptyHeaderPolicy, ENV_DELIMITER, ENV_EMPTY_HEADER,
    ENV_ERROR_PREVIEW, ENV_SKIP_VALIDATION,
};
pub use pipeline::{format_delimiter, process_bytes, process_csv_file, CsvInfo, PipelineResult};
pub use processor::{process, BatchProcessor};
pub use result::{join_row, BatchResult, ErrorStage, RowError, RowErrorKind, ROW_SEPARATOR};
