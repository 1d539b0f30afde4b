//! Batch state machine: header, then rows, then done.
//!
//! ```text
//! ExpectHeader ──header──→ ProcessingRows ──finish──→ Done
//!      │                                              ↑
//!      └──────────── empty header ────────────────────┘
//! ```
//!
//! Rows are processed strictly in arrival order. Each row runs
//! bind → transform → validate; the first failing stage becomes a
//! [`RowError`] and the batch moves on to the next row.

use crate::batch::options::{BatchOptions, EmptyHeaderPolicy};
use crate::batch::result::{BatchResult, RowError};
use crate::binding::{ColumnIndex, RecordBinder};
use crate::error::PipelineError;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::transform::{transform_row, PayloadOf, ToPayload};
use crate::validation::Validator;

#[derive(Debug)]
enum State {
    ExpectHeader,
    ProcessingRows { index: ColumnIndex },
    Done,
}

/// Incremental batch processor.
///
/// Feed it records with [`push`](Self::push), header first, then call
/// [`finish`](Self::finish) to get the [`BatchResult`].
pub struct BatchProcessor<B, V>
where
    B: RecordBinder,
    B::Record: ToPayload,
{
    binder: B,
    validator: V,
    options: BatchOptions,
    state: State,
    result: BatchResult<PayloadOf<B>>,
    rows_seen: usize,
    ignored: usize,
}

impl<B, V> BatchProcessor<B, V>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>>,
{
    pub fn new(binder: B, validator: V, options: BatchOptions) -> Self {
        Self {
            binder,
            validator,
            options,
            state: State::ExpectHeader,
            result: BatchResult::new(),
            rows_seen: 0,
            ignored: 0,
        }
    }

    /// Number of data rows processed so far.
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    /// True once the header has been accepted and rows are being processed.
    pub fn is_processing(&self) -> bool {
        matches!(self.state, State::ProcessingRows { .. })
    }

    /// Consume one record.
    ///
    /// Fails only when the header is empty and the policy is
    /// [`EmptyHeaderPolicy::Abort`]. Records arriving after a structural
    /// error are ignored.
    pub fn push<S: AsRef<str>>(&mut self, record: &[S]) -> Result<(), PipelineError> {
        match &self.state {
            State::ExpectHeader => self.accept_header(record),
            State::ProcessingRows { index } => {
                let validator = (!self.options.skip_validation).then_some(&self.validator);
                let outcome = transform_row(&self.binder, index, record, validator);
                match outcome {
                    Ok(payload) => self.result.payloads.push(payload),
                    Err(failure) => self
                        .result
                        .errors
                        .push(RowError::from_failure(self.rows_seen, record, failure)),
                }
                self.rows_seen += 1;
                Ok(())
            }
            State::Done => {
                self.ignored += 1;
                Ok(())
            }
        }
    }

    /// Finish the batch and return what was collected.
    pub fn finish(mut self) -> Result<BatchResult<PayloadOf<B>>, PipelineError> {
        if matches!(self.state, State::ExpectHeader) {
            self.empty_header::<&str>(&[])?;
        }
        self.state = State::Done;

        if self.ignored > 0 {
            log_warning(format!(
                "{} rows ignored after structural error",
                self.ignored
            ));
        }
        self.log_summary();
        Ok(self.result)
    }

    fn accept_header<S: AsRef<str>>(&mut self, header: &[S]) -> Result<(), PipelineError> {
        if header.iter().all(|cell| cell.as_ref().is_empty()) {
            return self.empty_header(header);
        }

        let index = ColumnIndex::new(header);
        log_info(format!("Header has {} columns", index.width()));
        let duplicates = index.duplicates();
        if !duplicates.is_empty() {
            log_warning(format!(
                "Duplicate header columns (last reachable wins): {}",
                duplicates.join(", ")
            ));
        }
        self.state = State::ProcessingRows { index };
        Ok(())
    }

    fn empty_header<S: AsRef<str>>(&mut self, header: &[S]) -> Result<(), PipelineError> {
        self.state = State::Done;
        match self.options.empty_header {
            EmptyHeaderPolicy::Record => {
                log_error("Header row is missing or empty");
                self.result.errors.push(RowError::structural(header));
                Ok(())
            }
            EmptyHeaderPolicy::Abort => {
                log_error("Header row is missing or empty, aborting batch");
                Err(PipelineError::EmptyHeader)
            }
        }
    }

    fn log_summary(&self) {
        if self.result.errors.is_empty() {
            log_success(format!(
                "All {} rows bound successfully",
                self.result.payloads.len()
            ));
            return;
        }

        log_warning(self.result.summary());
        for err in self.result.errors.iter().take(self.options.error_preview) {
            log_error(format!(
                "Row {} [{}]: {} ({})",
                err.index,
                err.kind.tag(),
                err.error,
                err.row
            ));
        }
    }
}

/// Run a whole batch over an in-memory sequence of records.
///
/// # Example
/// ```
/// use rowbind::batch::{process, BatchOptions};
/// use rowbind::binding::{FieldKind, RecordSchema};
/// use rowbind::validation::NoValidation;
///
/// let schema = RecordSchema::new().field("id", "id", FieldKind::Int);
/// let records = vec![vec!["id"], vec!["1"], vec!["x"]];
///
/// let result = process(&schema, &records, NoValidation, &BatchOptions::default()).unwrap();
/// assert_eq!(result.payloads.len(), 1);
/// assert_eq!(result.errors.len(), 1);
/// ```
pub fn process<B, V, I, S>(
    binder: B,
    records: I,
    validator: V,
    options: &BatchOptions,
) -> Result<BatchResult<PayloadOf<B>>, PipelineError>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>>,
    I: IntoIterator,
    I::Item: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut processor = BatchProcessor::new(binder, validator, options.clone());
    for record in records {
        processor.push(record.as_ref())?;
    }
    processor.finish()
}
