//! Intermediate record to domain payload transformation.
//!
//! Each intermediate shape implements [`ToPayload`]. [`transform_row`] runs
//! one row through the whole per-row pipeline:
//!
//! ```text
//! row → RecordBinder::bind_row → ToPayload::to_payload → Validator::validate → payload
//! ```
//!
//! and reports the first failing stage as a [`RowFailure`].

use crate::binding::{ColumnIndex, RecordBinder};
use crate::error::RowFailure;
use crate::validation::Validator;

/// Conversion of a bound intermediate record into a domain payload.
///
/// Must not panic for any record that bound successfully. Use
/// [`std::convert::Infallible`] as the error type when the conversion
/// cannot fail.
pub trait ToPayload {
    type Payload;
    type Error: std::error::Error + Send + Sync + 'static;

    fn to_payload(self) -> Result<Self::Payload, Self::Error>;
}

/// Payload type produced by a binder's records.
pub type PayloadOf<B> = <<B as RecordBinder>::Record as ToPayload>::Payload;

/// Bind, transform and (optionally) validate one row.
pub fn transform_row<B, V, S>(
    binder: &B,
    index: &ColumnIndex,
    row: &[S],
    validator: Option<&V>,
) -> Result<PayloadOf<B>, RowFailure<PayloadOf<B>>>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>> + ?Sized,
    S: AsRef<str>,
{
    let record = binder.bind_row(index, row)?;
    let payload = record
        .to_payload()
        .map_err(|e| RowFailure::Transform(Box::new(e)))?;

    if let Some(validator) = validator {
        if let Err(error) = validator.validate(&payload) {
            return Err(RowFailure::Validation { payload, error });
        }
    }
    Ok(payload)
}

/// [`transform_row`] for a single row with its header.
pub fn transform_csv_row<B, V, H, S>(
    binder: &B,
    header: &[H],
    row: &[S],
    validator: &V,
) -> Result<PayloadOf<B>, RowFailure<PayloadOf<B>>>
where
    B: RecordBinder,
    B::Record: ToPayload,
    V: Validator<PayloadOf<B>> + ?Sized,
    H: AsRef<str>,
    S: AsRef<str>,
{
    transform_row(binder, &ColumnIndex::new(header), row, Some(validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::TypedBinder;
    use crate::error::{BindError, ValidationError};
    use crate::validation::{required, NoValidation, RuleValidator, Validate};
    use std::convert::Infallible;
    use std::num::ParseIntError;

    crate::bind_record! {
        #[derive(Debug)]
        struct ExampleColumns {
            #[column = "id"]
            id: i64,
            #[column = "name"]
            name: String,
        }
    }

    #[derive(Debug, PartialEq)]
    struct Example {
        id: i64,
        name: String,
    }

    impl ToPayload for ExampleColumns {
        type Payload = Example;
        type Error = Infallible;

        fn to_payload(self) -> Result<Example, Infallible> {
            Ok(Example {
                id: self.id,
                name: self.name,
            })
        }
    }

    impl Validate for Example {
        fn validate(&self) -> Result<(), ValidationError> {
            required("name", &self.name)
        }
    }

    crate::bind_record! {
        struct LuckyColumns {
            #[column = "Lucky Number"]
            number: String,
        }
    }

    impl ToPayload for LuckyColumns {
        type Payload = i64;
        type Error = ParseIntError;

        fn to_payload(self) -> Result<i64, ParseIntError> {
            self.number.parse()
        }
    }

    #[test]
    fn test_transform_csv_row() {
        let binder = TypedBinder::<ExampleColumns>::new();
        let payload = transform_csv_row(&binder, &["id", "name"], &["1", "John Doe"], &RuleValidator).unwrap();
        assert_eq!(
            payload,
            Example {
                id: 1,
                name: "John Doe".into()
            }
        );
    }

    #[test]
    fn test_bind_failure_stage() {
        let binder = TypedBinder::<ExampleColumns>::new();
        let failure = transform_csv_row(&binder, &["id", "name"], &["x", "John Doe"], &NoValidation).unwrap_err();
        assert!(matches!(failure, RowFailure::Bind(BindError::FieldConversion { .. })));
    }

    #[test]
    fn test_transform_failure_stage() {
        let binder = TypedBinder::<LuckyColumns>::new();
        let failure = transform_csv_row(&binder, &["Lucky Number"], &["seven"], &NoValidation).unwrap_err();
        assert!(matches!(failure, RowFailure::Transform(_)));
        assert!(failure.to_string().contains("invalid digit"));
    }

    #[test]
    fn test_validation_failure_keeps_payload() {
        let binder = TypedBinder::<ExampleColumns>::new();
        let failure = transform_csv_row(&binder, &["id", "name"], &["3", ""], &RuleValidator).unwrap_err();
        match failure {
            RowFailure::Validation { payload, error } => {
                assert_eq!(payload.id, 3);
                assert_eq!(error, ValidationError::MissingField("name".into()));
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[test]
    fn test_validation_skipped() {
        let binder = TypedBinder::<ExampleColumns>::new();
        let index = ColumnIndex::new(&["id", "name"]);
        let payload = transform_row::<_, RuleValidator, _>(&binder, &index, &["3", ""], None).unwrap();
        assert_eq!(payload.name, "");
    }
}
