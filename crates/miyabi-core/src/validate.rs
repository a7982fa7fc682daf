//! Recursive structural validation.
//!
//! [`validate`] dispatches over the closed [`SchemaType`] vocabulary and
//! returns a fully populated [`SchemaValue`]. Errors carry a dotted path
//! rooted at [`ROOT_PATH`], e.g. `$.items[1].name`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{RecordInstance, RecordSchema};
use crate::schema::{SchemaType, SchemaValue};

/// Path of the value being validated at the top level.
pub const ROOT_PATH: &str = "$";

/// A validation error from schema validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("validation error at '{path}': {message}")]
pub struct ValidationError {
    /// The JSON path where the error occurred.
    pub path: String,
    /// The error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validates `raw` against `schema`.
///
/// Scalars coerce, lists validate every element in order and stop at the
/// first failure, records require an object carrying every declared field.
///
/// # Example
///
/// ```
/// use miyabi_core::{validate, SchemaType, SchemaValue};
/// use serde_json::json;
///
/// let ids = SchemaType::list(SchemaType::integer());
/// assert_eq!(
///     validate(&ids, &json!(["1", "2"])).unwrap(),
///     SchemaValue::List(vec![SchemaValue::Integer(1), SchemaValue::Integer(2)])
/// );
///
/// let error = validate(&ids, &json!(["1", "x"])).unwrap_err();
/// assert_eq!(error.path, "$[1]");
/// ```
pub fn validate(schema: &SchemaType, raw: &serde_json::Value) -> Result<SchemaValue, ValidationError> {
    validate_at_path(schema, raw, ROOT_PATH)
}

/// Validates `raw` against a record schema, returning the populated instance.
pub fn validate_record(
    schema: &Arc<RecordSchema>,
    raw: &serde_json::Value,
) -> Result<RecordInstance, ValidationError> {
    validate_record_at_path(schema, raw, ROOT_PATH)
}

/// Validates `raw` against `schema`, reporting errors relative to `path`.
///
/// Used when the value is one field of a larger document, e.g. a single
/// path capture validated at `$.id`.
pub fn validate_at_path(
    schema: &SchemaType,
    raw: &serde_json::Value,
    path: &str,
) -> Result<SchemaValue, ValidationError> {
    match schema {
        SchemaType::Scalar(scalar) => scalar.validate_at_path(raw, path),
        SchemaType::List(list) => list.validate_at_path(raw, path),
        SchemaType::Record(record) => {
            validate_record_at_path(record, raw, path).map(SchemaValue::Record)
        }
    }
}

pub(crate) fn validate_record_at_path(
    schema: &Arc<RecordSchema>,
    raw: &serde_json::Value,
    path: &str,
) -> Result<RecordInstance, ValidationError> {
    let object = raw.as_object().ok_or_else(|| {
        ValidationError::new(
            path,
            format!(
                "expected object for '{}', got {}",
                schema.name(),
                value_type_name(raw)
            ),
        )
    })?;

    let mut builder = schema.instance();
    for field in schema.fields() {
        let field_path = format!("{path}.{}", field.name());
        let value = object
            .get(field.name())
            .ok_or_else(|| ValidationError::new(&field_path, "required field is missing"))?;
        let validated = validate_at_path(field.schema(), value, &field_path)?;
        builder.insert(field.name(), validated);
    }

    // Every declared field was set above.
    Ok(builder.build_partial())
}

/// Returns a human-readable name for a JSON value type.
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("Item")
            .field("id", SchemaType::integer())
            .field("name", SchemaType::string())
            .build()
    }

    fn order_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("Order")
            .field("id", SchemaType::integer())
            .field("items", SchemaType::list(SchemaType::record(item_schema())))
            .build()
    }

    #[test]
    fn test_record_validation_populates_every_field() {
        let instance = validate_record(&item_schema(), &json!({"id": "3", "name": "pen"})).unwrap();

        assert!(instance.is_complete());
        assert_eq!(instance.get("id"), Some(&SchemaValue::Integer(3)));
        assert_eq!(instance.get("name"), Some(&SchemaValue::String("pen".to_string())));
    }

    #[test]
    fn test_record_validation_ignores_undeclared_keys() {
        let instance =
            validate_record(&item_schema(), &json!({"id": 1, "name": "pen", "extra": true}))
                .unwrap();
        assert_eq!(instance.len(), 2);
        assert!(instance.get("extra").is_none());
    }

    #[test]
    fn test_record_missing_field() {
        let error = validate_record(&item_schema(), &json!({"id": 1})).unwrap_err();
        assert_eq!(error.path, "$.name");
        assert!(error.message.contains("missing"));
    }

    #[test]
    fn test_record_requires_object() {
        let error = validate_record(&item_schema(), &json!([1, 2])).unwrap_err();
        assert_eq!(error.path, "$");
        assert!(error.message.contains("got array"));
    }

    #[test]
    fn test_nested_error_path() {
        let raw = json!({
            "id": 1,
            "items": [
                {"id": 1, "name": "pen"},
                {"id": 2}
            ]
        });

        let error = validate_record(&order_schema(), &raw).unwrap_err();
        assert_eq!(error.path, "$.items[1].name");
    }

    #[test]
    fn test_nested_records_validate() {
        let raw = json!({
            "id": "10",
            "items": [{"id": "1", "name": "pen"}, {"id": 2, "name": 5}]
        });

        let order = validate_record(&order_schema(), &raw).unwrap();
        let items = order.get("items").and_then(SchemaValue::as_list).unwrap();
        assert_eq!(items.len(), 2);

        let second = items[1].as_record().unwrap();
        assert_eq!(second.get("name"), Some(&SchemaValue::String("5".to_string())));
        assert_eq!(order.to_json(), json!({
            "id": 10,
            "items": [{"id": 1, "name": "pen"}, {"id": 2, "name": "5"}]
        }));
    }

    #[test]
    fn test_validation_error_serialization() {
        let error = ValidationError::new("$.id", "expected integer, got string");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, json!({"path": "$.id", "message": "expected integer, got string"}));
        assert_eq!(
            error.to_string(),
            "validation error at '$.id': expected integer, got string"
        );
    }
}
