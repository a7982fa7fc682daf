//! Merging partial record instances into a canonical one.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{MiyabiError, MiyabiResult};
use crate::record::{RecordInstance, RecordSchema};
use crate::schema::SchemaValue;

/// Combines `sources` into a new instance of `destination`.
///
/// Every set field of every source is overlaid in order, so a later source
/// wins when two supply the same name. Each field `destination` declares is
/// then taken from the overlay; fields only the sources declare are dropped.
///
/// # Errors
///
/// [`MiyabiError::MissingField`] for the first declared field no source set.
///
/// # Example
///
/// ```
/// use miyabi_core::{combine_schemas, RecordSchema, SchemaType};
///
/// let path = RecordSchema::builder("Path").field("id", SchemaType::integer()).build();
/// let body = RecordSchema::builder("Body").field("name", SchemaType::string()).build();
/// let user = RecordSchema::builder("User")
///     .field("id", SchemaType::integer())
///     .field("name", SchemaType::string())
///     .build();
///
/// let from_path = path.instance().set("id", 1).unwrap().build().unwrap();
/// let from_body = body.instance().set("name", "ann").unwrap().build().unwrap();
///
/// let combined = combine_schemas(&user, [&from_path, &from_body]).unwrap();
/// assert_eq!(combined.to_json(), serde_json::json!({"id": 1, "name": "ann"}));
/// ```
pub fn combine_schemas<'a>(
    destination: &Arc<RecordSchema>,
    sources: impl IntoIterator<Item = &'a RecordInstance>,
) -> MiyabiResult<RecordInstance> {
    let mut overlay: HashMap<&str, &SchemaValue> = HashMap::new();
    for source in sources {
        overlay.extend(source.iter());
    }

    let mut builder = destination.instance();
    for field in destination.fields() {
        let value = overlay
            .get(field.name())
            .ok_or_else(|| MiyabiError::missing_field(destination.name(), field.name()))?;
        builder.insert(field.name(), (*value).clone());
    }

    Ok(builder.build_partial())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaType;

    fn pair_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("Pair")
            .field("a", SchemaType::integer())
            .field("b", SchemaType::integer())
            .build()
    }

    fn single(name: &str, field: &str, value: i64) -> RecordInstance {
        RecordSchema::builder(name)
            .field(field, SchemaType::integer())
            .build()
            .instance()
            .set(field, value)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_combine_two_sources() {
        let src1 = single("A", "a", 1);
        let src2 = single("B", "b", 2);

        let combined = combine_schemas(&pair_schema(), [&src1, &src2]).unwrap();
        assert_eq!(combined.name(), "Pair");
        assert_eq!(combined.get("a"), Some(&SchemaValue::Integer(1)));
        assert_eq!(combined.get("b"), Some(&SchemaValue::Integer(2)));
    }

    #[test]
    fn test_combine_missing_field() {
        let src1 = single("A", "a", 1);

        let error = combine_schemas(&pair_schema(), [&src1]).unwrap_err();
        assert_eq!(error, MiyabiError::missing_field("Pair", "b"));
    }

    #[test]
    fn test_later_source_wins() {
        let first = single("A", "a", 1);
        let second = single("A2", "a", 9);
        let other = single("B", "b", 2);

        let combined = combine_schemas(&pair_schema(), [&first, &other, &second]).unwrap();
        assert_eq!(combined.get("a"), Some(&SchemaValue::Integer(9)));
    }

    #[test]
    fn test_extra_source_fields_are_dropped() {
        let a = single("A", "a", 1);
        let b = single("B", "b", 2);
        let extra = single("C", "c", 3);

        let combined = combine_schemas(&pair_schema(), [&a, &b, &extra]).unwrap();
        assert_eq!(combined.len(), 2);
        assert!(!combined.is_set("c"));
    }

    #[test]
    fn test_combine_empty_destination() {
        let empty = RecordSchema::builder("Empty").build();
        let combined = combine_schemas(&empty, std::iter::empty()).unwrap();
        assert!(combined.is_empty());
        assert!(combined.is_complete());
    }
}
