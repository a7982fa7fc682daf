//! Schema type vocabulary.
//!
//! A schema is one of a closed set of kinds:
//!
//! - [`ScalarType`] - `Integer` or `String`, coercing raw input
//! - [`ListType`] - an ordered sequence of one child type
//! - a [`RecordSchema`] - a named set of typed fields
//!
//! Validation produces a [`SchemaValue`], the typed counterpart of the raw
//! JSON input.

use std::sync::Arc;

use crate::record::{RecordInstance, RecordSchema};
use crate::validate::{value_type_name, ValidationError, ROOT_PATH};

/// Leaf schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// A signed 64-bit integer.
    Integer,
    /// A UTF-8 string.
    String,
}

impl ScalarType {
    /// Returns the type name used in generated documentation.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::String => "String",
        }
    }

    /// Coerces `raw` into a value of this type.
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_core::{ScalarType, SchemaValue};
    /// use serde_json::json;
    ///
    /// assert_eq!(ScalarType::Integer.validate(&json!("42")).unwrap(), SchemaValue::Integer(42));
    /// assert!(ScalarType::Integer.validate(&json!("abc")).is_err());
    /// assert_eq!(ScalarType::String.validate(&json!(7)).unwrap(), SchemaValue::from("7"));
    /// ```
    pub fn validate(&self, raw: &serde_json::Value) -> Result<SchemaValue, ValidationError> {
        self.validate_at_path(raw, ROOT_PATH)
    }

    pub(crate) fn validate_at_path(
        &self,
        raw: &serde_json::Value,
        path: &str,
    ) -> Result<SchemaValue, ValidationError> {
        match self {
            Self::Integer => coerce_integer(raw, path).map(SchemaValue::Integer),
            Self::String => Ok(SchemaValue::String(coerce_string(raw))),
        }
    }
}

fn coerce_integer(raw: &serde_json::Value, path: &str) -> Result<i64, ValidationError> {
    match raw {
        serde_json::Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Ok(value);
            }
            if number.is_u64() {
                return Err(ValidationError::new(
                    path,
                    format!("integer {number} is out of range"),
                ));
            }
            number
                .as_f64()
                .and_then(truncate_float)
                .ok_or_else(|| ValidationError::new(path, format!("number {number} is not an integer")))
        }
        serde_json::Value::Bool(flag) => Ok(i64::from(*flag)),
        serde_json::Value::String(text) => text.trim().parse::<i64>().map_err(|_| {
            ValidationError::new(path, format!("'{text}' is not a valid integer"))
        }),
        other => Err(ValidationError::new(
            path,
            format!("expected integer, got {}", value_type_name(other)),
        )),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate_float(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn coerce_string(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// An ordered list of values of one child type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListType {
    child: Box<SchemaType>,
}

impl ListType {
    /// Creates a list type over `child`.
    #[must_use]
    pub fn new(child: SchemaType) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    /// Returns the element type.
    #[must_use]
    pub fn child(&self) -> &SchemaType {
        &self.child
    }

    /// Validates every element of `raw` against the child type.
    ///
    /// Stops at the first failing element; later elements are not visited.
    pub fn validate(&self, raw: &serde_json::Value) -> Result<SchemaValue, ValidationError> {
        self.validate_at_path(raw, ROOT_PATH)
    }

    pub(crate) fn validate_at_path(
        &self,
        raw: &serde_json::Value,
        path: &str,
    ) -> Result<SchemaValue, ValidationError> {
        let elements = raw.as_array().ok_or_else(|| {
            ValidationError::new(path, format!("expected list, got {}", value_type_name(raw)))
        })?;

        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                crate::validate::validate_at_path(&self.child, element, &format!("{path}[{index}]"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(SchemaValue::List)
    }
}

/// A schema declaration.
///
/// # Example
///
/// ```
/// use miyabi_core::{RecordSchema, SchemaType};
///
/// let tag = RecordSchema::builder("Tag").field("label", SchemaType::string()).build();
///
/// assert_eq!(SchemaType::integer().type_name(), "Integer");
/// assert_eq!(SchemaType::list(SchemaType::string()).type_name(), "List");
/// assert_eq!(SchemaType::record(tag).type_name(), "Tag");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    /// A leaf type.
    Scalar(ScalarType),
    /// A list of a child type.
    List(ListType),
    /// A nested record.
    Record(Arc<RecordSchema>),
}

impl SchemaType {
    /// The integer scalar.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Scalar(ScalarType::Integer)
    }

    /// The string scalar.
    #[must_use]
    pub const fn string() -> Self {
        Self::Scalar(ScalarType::String)
    }

    /// A list of `child`.
    #[must_use]
    pub fn list(child: Self) -> Self {
        Self::List(ListType::new(child))
    }

    /// A nested record.
    #[must_use]
    pub fn record(schema: Arc<RecordSchema>) -> Self {
        Self::Record(schema)
    }

    /// Returns the type name: `Integer`, `String`, `List` or the record's name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.type_name(),
            Self::List(_) => "List",
            Self::Record(record) => record.name(),
        }
    }

    /// Returns the record schema if this is a record type.
    #[must_use]
    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Validates `raw` against this type.
    pub fn validate(&self, raw: &serde_json::Value) -> Result<SchemaValue, ValidationError> {
        crate::validate::validate(self, raw)
    }
}

impl From<ScalarType> for SchemaType {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Arc<RecordSchema>> for SchemaType {
    fn from(record: Arc<RecordSchema>) -> Self {
        Self::Record(record)
    }
}

/// A validated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValue {
    /// An integer value.
    Integer(i64),
    /// A string value.
    String(String),
    /// A list of values.
    List(Vec<SchemaValue>),
    /// A populated record.
    Record(RecordInstance),
}

impl SchemaValue {
    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[SchemaValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the record instance, if this is a record.
    #[must_use]
    pub const fn as_record(&self) -> Option<&RecordInstance> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Converts the value to JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(value) => serde_json::Value::from(*value),
            Self::String(value) => serde_json::Value::String(value.clone()),
            Self::List(values) => values.iter().map(Self::to_json).collect(),
            Self::Record(record) => record.to_json(),
        }
    }
}

impl From<i64> for SchemaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SchemaValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for SchemaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SchemaValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<SchemaValue>> for SchemaValue {
    fn from(values: Vec<SchemaValue>) -> Self {
        Self::List(values)
    }
}

impl From<RecordInstance> for SchemaValue {
    fn from(record: RecordInstance) -> Self {
        Self::Record(record)
    }
}
