//! Partial schema extractors.
//!
//! Each extractor validates one slice of the request (path captures or the
//! parsed body) against its declared partial schema. The result is a
//! possibly partial [`RecordInstance`]; completeness is enforced later by
//! the combiner.

use std::collections::HashMap;
use std::sync::Arc;

use miyabi_core::{
    validate_at_path, MiyabiError, MiyabiResult, RecordInstance, RecordSchema, ROOT_PATH,
};

/// Validates raw path captures against `template`.
///
/// Returns `Ok(None)` when no path schema is declared. Captures the schema
/// does not declare are ignored.
///
/// # Errors
///
/// [`MiyabiError::Validation`] for a capture that does not coerce to its
/// field type, or an absent capture when `reject_missing_fields` is set.
pub fn validate_path_schema(
    template: Option<&Arc<RecordSchema>>,
    path_captures: &HashMap<String, String>,
    reject_missing_fields: bool,
) -> MiyabiResult<Option<RecordInstance>> {
    let Some(template) = template else {
        return Ok(None);
    };

    let mut builder = template.instance();
    for field in template.fields() {
        let path = field_path(field.name());
        match path_captures.get(field.name()) {
            Some(raw) => {
                let raw = serde_json::Value::String(raw.clone());
                let value = validate_at_path(field.schema(), &raw, &path)?;
                builder = builder.set(field.name(), value)?;
            }
            None if reject_missing_fields => {
                return Err(MiyabiError::validation(path, "required path parameter is missing"));
            }
            None => {}
        }
    }

    Ok(Some(builder.build_partial()))
}

/// Validates a parsed request body against `template`.
///
/// Returns `Ok(None)` when no body schema is declared. A `null` body is
/// treated as an empty object.
///
/// # Errors
///
/// [`MiyabiError::Validation`] for a non-object body or a failing field.
/// An absent field fails too when `reject_missing_fields` is set.
pub fn validate_body_schema(
    template: Option<&Arc<RecordSchema>>,
    body: &serde_json::Value,
    reject_missing_fields: bool,
) -> MiyabiResult<Option<RecordInstance>> {
    let Some(template) = template else {
        return Ok(None);
    };

    let empty = serde_json::Map::new();
    let object = match body {
        serde_json::Value::Null => &empty,
        serde_json::Value::Object(object) => object,
        _ => {
            return Err(MiyabiError::validation(
                ROOT_PATH,
                format!("expected object body for '{}'", template.name()),
            ));
        }
    };

    let mut builder = template.instance();
    for field in template.fields() {
        let path = field_path(field.name());
        match object.get(field.name()) {
            Some(raw) => {
                let value = validate_at_path(field.schema(), raw, &path)?;
                builder = builder.set(field.name(), value)?;
            }
            None if reject_missing_fields => {
                return Err(MiyabiError::validation(path, "required field is missing"));
            }
            None => {}
        }
    }

    Ok(Some(builder.build_partial()))
}

fn field_path(name: &str) -> String {
    format!("{ROOT_PATH}.{name}")
}
