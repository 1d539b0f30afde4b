//! End-to-end batch scenarios through the public API.

use std::convert::Infallible;
use std::num::ParseIntError;

use rowbind::batch::{process, process_bytes, BatchOptions, EmptyHeaderPolicy, ErrorStage, RowErrorKind};
use rowbind::binding::{FieldKind, RecordSchema, TypedBinder};
use rowbind::logs::LOG_BROADCASTER;
use rowbind::transform::ToPayload;
use rowbind::validation::{required, NoValidation, RuleValidator, Validate};
use rowbind::{PipelineError, ValidationError};
use serde::Serialize;
use serde_json::json;

rowbind::bind_record! {
    #[derive(Debug)]
    pub struct ExampleColumns {
        #[column = "id"]
        pub id: i64,
        #[column = "name,required"]
        pub name: String,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Example {
    pub id: i64,
    pub name: String,
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

rowbind::bind_record! {
    pub struct LuckyColumns {
        #[column = "Name"]
        pub name: String,
        #[column = "Lucky Number"]
        pub number: String,
    }
}

impl ToPayload for LuckyColumns {
    type Payload = (String, u32);
    type Error = ParseIntError;

    fn to_payload(self) -> Result<(String, u32), ParseIntError> {
        Ok((self.name, self.number.parse()?))
    }
}

fn options() -> BatchOptions {
    LOG_BROADCASTER.set_echo(false);
    BatchOptions::default()
}

fn example(id: i64, name: &str) -> Example {
    Example {
        id,
        name: name.to_string(),
    }
}

#[test]
fn well_formed_rows_all_become_payloads() {
    let records = vec![
        vec!["id", "name"],
        vec!["1", "John Doe"],
        vec!["2", "Jane Smith"],
    ];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, RuleValidator, &options()).unwrap();

    assert_eq!(result.payloads, vec![example(1, "John Doe"), example(2, "Jane Smith")]);
    assert!(result.errors.is_empty());
}

#[test]
fn non_numeric_id_is_a_conversion_error() {
    let records = vec![vec!["id", "name"], vec!["x", "John Doe"]];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, RuleValidator, &options()).unwrap();

    assert!(result.payloads.is_empty());
    assert_eq!(result.errors.len(), 1);

    let err = &result.errors[0];
    assert_eq!(err.stage, ErrorStage::FieldConversion);
    assert_eq!(err.kind, RowErrorKind::BindOrTransformFailure);
    assert_eq!(err.error_message, "Error generating payload");
    assert_eq!(err.row, "x, John Doe");
}

#[test]
fn empty_header_is_a_structural_error() {
    let records: Vec<Vec<&str>> = vec![vec![], vec!["1", "John Doe"], vec!["2", "Jane Smith"]];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, RuleValidator, &options()).unwrap();

    assert!(result.payloads.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, RowErrorKind::InvalidColumnsCount);
    assert_eq!(result.errors[0].error_message, "Invalid columns count");
}

#[test]
fn empty_header_can_abort_the_batch() {
    let records: Vec<Vec<&str>> = vec![vec![], vec!["1", "John Doe"]];
    let options = BatchOptions {
        empty_header: EmptyHeaderPolicy::Abort,
        ..options()
    };
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, RuleValidator, &options);
    assert!(matches!(result, Err(PipelineError::EmptyHeader)));
}

#[test]
fn missing_column_is_never_defaulted() {
    let records = vec![vec!["id", "full_name"], vec!["1", "John Doe"]];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, NoValidation, &options()).unwrap();

    assert!(result.payloads.is_empty());
    assert_eq!(result.errors[0].stage, ErrorStage::ColumnNotFound);
    assert_eq!(result.errors[0].error, "column not found: name,required");
}

#[test]
fn successes_keep_input_order_around_failures() {
    let records = vec![
        vec!["id", "name"],
        vec!["10", "a"],
        vec!["oops", "b"],
        vec!["30", ""],
        vec!["40", "d"],
        vec!["50"],
        vec!["60", "f"],
    ];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, RuleValidator, &options()).unwrap();

    assert_eq!(result.payloads.len() + result.errors.len(), records.len() - 1);
    let ids: Vec<i64> = result.payloads.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10, 40, 60]);

    let indexes: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
    assert_eq!(indexes, vec![1, 2, 4]);

    let invalid = &result.errors[1];
    assert_eq!(invalid.stage, ErrorStage::Validation);
    assert_eq!(invalid.payload, Some(example(30, "")));
    assert_eq!(
        invalid.error,
        "INVALID_PAYLOAD_ROW_DATA: Missing required field: name"
    );
}

#[test]
fn failing_to_payload_is_a_transform_error() {
    let records = vec![
        vec!["Name", "Lucky Number"],
        vec!["Ann", "7"],
        vec!["Bob", "seven"],
        vec!["Cid", "13"],
        vec!["Dee", "42"],
    ];
    let result = process(TypedBinder::<LuckyColumns>::new(), &records, NoValidation, &options()).unwrap();

    assert_eq!(result.errors.len(), 1);
    let err = &result.errors[0];
    assert_eq!(err.stage, ErrorStage::Transform);
    assert_eq!(err.kind, RowErrorKind::BindOrTransformFailure);
    assert_eq!(err.index, 1);
    assert_eq!(err.row, "Bob, seven");
    assert!(err.error.contains("invalid digit"));

    let json = serde_json::to_value(err).unwrap();
    assert_eq!(json["tag"], "CSV_ERROR_SETTING_STRUCT_PAYLOAD");
    assert_eq!(json["stage"], "transform");

    assert_eq!(
        result.payloads,
        vec![
            ("Ann".to_string(), 7),
            ("Cid".to_string(), 13),
            ("Dee".to_string(), 42),
        ]
    );
}

#[test]
fn dynamic_schema_from_csv_bytes() {
    let schema = RecordSchema::from_json(
        r#"{"fields": [
            {"name": "id", "column": "ID", "kind": "int"},
            {"name": "active", "column": "Active", "kind": "bool"},
            {"name": "score", "column": "Score", "kind": "float"}
        ]}"#,
    )
    .unwrap();
    let csv = b"ID;Active;Score\n1;T;2.5\n2;maybe;1\n3;0;-4\n";

    let run = process_bytes(csv, &schema, NoValidation, &options()).unwrap();

    assert_eq!(run.csv_info.delimiter, ';');
    assert_eq!(run.csv_info.row_count, 3);
    assert_eq!(
        run.batch.payloads,
        vec![
            json!({"id": 1, "active": true, "score": 2.5}),
            json!({"id": 3, "active": false, "score": -4.0}),
        ]
    );
    assert_eq!(run.batch.errors[0].row, "2, maybe, 1");
    assert_eq!(run.batch.errors[0].stage, ErrorStage::FieldConversion);
}

#[test]
fn row_errors_serialize_with_stable_tags() {
    let records = vec![vec!["id", "name"], vec!["x", "John Doe"]];
    let result = process(TypedBinder::<ExampleColumns>::new(), &records, NoValidation, &options()).unwrap();

    let json = serde_json::to_value(&result.errors[0]).unwrap();
    assert_eq!(json["tag"], "CSV_ERROR_SETTING_STRUCT_PAYLOAD");
    assert_eq!(json["stage"], "field_conversion");
    assert_eq!(json["row"], "x, John Doe");
    assert_eq!(json["index"], 0);
}

#[test]
fn field_kinds_parse_from_names() {
    assert_eq!("integer".parse::<FieldKind>().unwrap(), FieldKind::Int);
    assert!("date".parse::<FieldKind>().is_err());
}
