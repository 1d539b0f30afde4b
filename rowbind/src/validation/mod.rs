//! Payload validation.
//!
//! Two ways to declare constraints on a domain payload:
//!
//! - Rules in code: implement [`Validate`] on the payload, usually with
//!   [`required`], and validate through [`RuleValidator`].
//! - A JSON Schema (draft 7) document: [`SchemaValidator`] serializes the
//!   payload and checks it against the schema.
//!
//! The batch only sees the [`Validator`] trait, so either can be plugged in
//! (or [`NoValidation`]).
//!
//! # Example
//!
//! ```rust
//! use rowbind::validation::{required, RuleValidator, Validate, Validator};
//! use rowbind::ValidationError;
//!
//! struct Payload {
//!     id: String,
//!     age: i64,
//! }
//!
//! impl Validate for Payload {
//!     fn validate(&self) -> Result<(), ValidationError> {
//!         required("id", &self.id)
//!     }
//! }
//!
//! let ok = Payload { id: "7".into(), age: 0 };
//! assert!(RuleValidator.validate(&ok).is_ok());
//!
//! let missing = Payload { id: String::new(), age: 30 };
//! assert_eq!(
//!     RuleValidator.validate(&missing),
//!     Err(ValidationError::MissingField("id".into()))
//! );
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::{PipelineError, ValidationError};

/// Validates a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every violation otherwise
///
/// # Example
/// ```
/// use serde_json::json;
/// use rowbind::validation::validate;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": {
///         "name": { "type": "string" }
///     }
/// });
///
/// assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
/// assert!(validate(&schema, &json!({ "age": 42 })).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Simpler form: just true/false.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

// =============================================================================
// Rules
// =============================================================================

/// Whether a value counts as present for the `required` rule.
///
/// Zero values are absent: empty strings and collections, `None`, `0`,
/// `0.0` and `false`.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

macro_rules! numeric_presence {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Presence for $ty {
                fn is_present(&self) -> bool {
                    *self != (0 as $ty)
                }
            }
        )+
    };
}

numeric_presence!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// The `required` rule.
pub fn required<T: Presence + ?Sized>(field: &str, value: &T) -> Result<(), ValidationError> {
    if value.is_present() {
        Ok(())
    } else {
        Err(ValidationError::MissingField(field.to_string()))
    }
}

/// Constraints a payload type declares on itself.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

// =============================================================================
// Validators
// =============================================================================

/// Checks a domain payload before it is accepted into a batch.
pub trait Validator<P> {
    fn validate(&self, payload: &P) -> Result<(), ValidationError>;
}

/// Validates payloads through their [`Validate`] impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl<P: Validate> Validator<P> for RuleValidator {
    fn validate(&self, payload: &P) -> Result<(), ValidationError> {
        payload.validate()
    }
}

/// Accepts every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl<P> Validator<P> for NoValidation {
    fn validate(&self, _payload: &P) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Validates serialized payloads against a JSON Schema (draft 7).
pub struct SchemaValidator {
    schema: Value,
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile the schema once for the whole batch.
    pub fn new(schema: Value) -> Result<Self, PipelineError> {
        let validator = jsonschema::draft7::new(&schema)
            .map_err(|e| PipelineError::Schema(format!("Invalid JSON schema: {}", e)))?;
        Ok(Self { schema, validator })
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate an already-serialized value.
    pub fn validate_value(&self, data: &Value) -> Result<(), ValidationError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(data)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::SchemaError { errors })
        }
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<P: Serialize> Validator<P> for SchemaValidator {
    fn validate(&self, payload: &P) -> Result<(), ValidationError> {
        let data = serde_json::to_value(payload).map_err(|e| ValidationError::SchemaError {
            errors: vec![format!("payload is not serializable: {}", e)],
        })?;
        self.validate_value(&data)
    }
}

impl<P, V: Validator<P> + ?Sized> Validator<P> for &V {
    fn validate(&self, payload: &P) -> Result<(), ValidationError> {
        (**self).validate(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "required": ["id", "name"],
            "properties": {
                "id": { "type": "integer", "minimum": 1 },
                "name": { "type": "string", "minLength": 1 }
            }
        })
    }

    #[derive(Serialize)]
    struct Person {
        id: i64,
        name: String,
    }

    impl Validate for Person {
        fn validate(&self) -> Result<(), ValidationError> {
            required("id", &self.id)?;
            required("name", &self.name)
        }
    }

    #[test]
    fn test_validate_against_schema() {
        assert!(validate(&person_schema(), &json!({ "id": 1, "name": "Ann" })).is_ok());
        let errors = validate(&person_schema(), &json!({ "id": 0 })).unwrap_err();
        assert!(!errors.is_empty());
        assert!(is_valid(&person_schema(), &json!({ "id": 2, "name": "Bo" })));
    }

    #[test]
    fn test_required_zero_values() {
        assert!(required("s", "").is_err());
        assert!(required("s", &String::from("x")).is_ok());
        assert!(required("n", &0i64).is_err());
        assert!(required("n", &-3i32).is_ok());
        assert!(required("f", &0.0f64).is_err());
        assert!(required("b", &false).is_err());
        assert!(required("o", &None::<u8>).is_err());
        assert!(required("o", &Some(0u8)).is_ok());
        assert!(required("v", &Vec::<u8>::new()).is_err());
    }

    #[test]
    fn test_rule_validator() {
        let ok = Person { id: 1, name: "Ann".into() };
        assert!(RuleValidator.validate(&ok).is_ok());

        let bad = Person { id: 1, name: String::new() };
        let err = RuleValidator.validate(&bad).unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(err.rule(), "required");
    }

    #[test]
    fn test_schema_validator() {
        let validator = SchemaValidator::new(person_schema()).unwrap();
        assert!(validator.validate(&Person { id: 3, name: "Cy".into() }).is_ok());

        let err = validator.validate(&Person { id: 0, name: "Cy".into() }).unwrap_err();
        assert!(matches!(err, ValidationError::SchemaError { ref errors } if errors.len() == 1));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let err = SchemaValidator::new(json!({ "type": 12 })).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_no_validation() {
        let validator = NoValidation;
        assert!(Validator::<Person>::validate(&validator, &Person { id: 0, name: String::new() }).is_ok());
    }
}
