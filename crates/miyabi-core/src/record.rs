//! Record schemas and their instances.
//!
//! A [`RecordSchema`] is a template: a name, an optional description and an
//! ordered list of typed fields fixed at declaration time. A
//! [`RecordInstance`] is that template populated with validated values,
//! created through the schema's factory [`RecordSchema::instance`].

use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::{MiyabiError, MiyabiResult};
use crate::schema::{SchemaType, SchemaValue};

/// A declared field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    schema: SchemaType,
}

impl FieldDef {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field type.
    #[must_use]
    pub const fn schema(&self) -> &SchemaType {
        &self.schema
    }
}

/// A named, ordered set of typed fields.
///
/// # Example
///
/// ```
/// use miyabi_core::{RecordSchema, SchemaType};
///
/// let schema = RecordSchema::builder("UserResponse")
///     .description("A user")
///     .field("id", SchemaType::integer())
///     .field("name", SchemaType::string())
///     .build();
///
/// assert_eq!(schema.name(), "UserResponse");
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
}

impl RecordSchema {
    /// Starts declaring a record schema.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(name)
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the documentation text, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if the schema declares `name`.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns the declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::name)
    }

    /// Returns `true` if both schemas declare the same fields with the same types.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.fields == other.fields
    }

    /// Creates an empty instance builder for this schema.
    #[must_use]
    pub fn instance(self: &Arc<Self>) -> InstanceBuilder {
        InstanceBuilder {
            schema: Arc::clone(self),
            values: IndexMap::with_capacity(self.fields.len()),
        }
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
}

impl RecordSchemaBuilder {
    /// Creates a builder for a schema called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares a field. Redeclaring a name replaces its type in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<SchemaType>) -> Self {
        let name = name.into();
        let schema = schema.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(existing) => existing.schema = schema,
            None => self.fields.push(FieldDef { name, schema }),
        }
        self
    }

    /// Builds the schema.
    #[must_use]
    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(RecordSchema {
            name: self.name,
            description: self.description,
            fields: self.fields,
        })
    }
}

/// A record schema populated with values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInstance {
    schema: Arc<RecordSchema>,
    values: IndexMap<String, SchemaValue>,
}

impl RecordInstance {
    /// Returns the schema this instance was built from.
    #[must_use]
    pub const fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Returns the value of `field`, if set.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&SchemaValue> {
        self.values.get(field)
    }

    /// Returns `true` if `field` has a value.
    #[must_use]
    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Returns the declared fields that have no value.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&str> {
        self.schema
            .field_names()
            .filter(|name| !self.values.contains_key(*name))
            .collect()
    }

    /// Returns `true` if every declared field has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.schema.field_names().all(|name| self.values.contains_key(name))
    }

    /// Returns the number of set fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over set fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaValue)> {
        self.schema
            .field_names()
            .filter_map(|name| self.values.get_key_value(name))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Converts the set fields to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    /// Deserializes the instance into a typed struct.
    ///
    /// # Example
    ///
    /// ```
    /// use miyabi_core::{validate_record, RecordSchema, SchemaType};
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize)]
    /// struct User {
    ///     id: i64,
    ///     name: String,
    /// }
    ///
    /// let schema = RecordSchema::builder("User")
    ///     .field("id", SchemaType::integer())
    ///     .field("name", SchemaType::string())
    ///     .build();
    ///
    /// let user: User = validate_record(&schema, &json!({"id": "1", "name": "ann"}))
    ///     .unwrap()
    ///     .deserialize()
    ///     .unwrap();
    /// assert_eq!(user.id, 1);
    /// assert_eq!(user.name, "ann");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

/// Factory for [`RecordInstance`], obtained from [`RecordSchema::instance`].
///
/// Values are stored as given; type conformance is the validator's job.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    schema: Arc<RecordSchema>,
    values: IndexMap<String, SchemaValue>,
}

impl InstanceBuilder {
    /// Sets a declared field.
    ///
    /// Setting a field the schema does not declare is a definition error.
    pub fn set(mut self, field: &str, value: impl Into<SchemaValue>) -> MiyabiResult<Self> {
        if !self.schema.has_field(field) {
            return Err(MiyabiError::definition(format!(
                "schema '{}' declares no field '{}'",
                self.schema.name(),
                field
            )));
        }
        self.insert(field, value.into());
        Ok(self)
    }

    /// Sets a field already known to be declared.
    pub(crate) fn insert(&mut self, field: &str, value: SchemaValue) {
        self.values.insert(field.to_string(), value);
    }

    /// Builds the instance, failing on the first unset field.
    pub fn build(self) -> MiyabiResult<RecordInstance> {
        if let Some(missing) = self
            .schema
            .field_names()
            .find(|name| !self.values.contains_key(*name))
        {
            return Err(MiyabiError::missing_field(self.schema.name(), missing));
        }
        Ok(self.build_partial())
    }

    /// Builds the instance, leaving unset fields absent.
    #[must_use]
    pub fn build_partial(self) -> RecordInstance {
        RecordInstance {
            schema: self.schema,
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("User")
            .description("A registered user")
            .field("id", SchemaType::integer())
            .field("name", SchemaType::string())
            .build()
    }

    #[test]
    fn test_schema_builder() {
        let schema = user_schema();
        assert_eq!(schema.name(), "User");
        assert_eq!(schema.description(), Some("A registered user"));
        assert_eq!(schema.fields().len(), 2);
        assert!(schema.has_field("id"));
        assert!(!schema.has_field("email"));
        assert_eq!(schema.field("name").unwrap().schema(), &SchemaType::string());
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let schema = RecordSchema::builder("Pair")
            .field("a", SchemaType::string())
            .field("b", SchemaType::string())
            .field("a", SchemaType::integer())
            .build();

        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(schema.field("a").unwrap().schema(), &SchemaType::integer());
    }

    #[test]
    fn test_same_shape_ignores_description() {
        let documented = user_schema();
        let bare = RecordSchema::builder("User")
            .field("id", SchemaType::integer())
            .field("name", SchemaType::string())
            .build();
        let different = RecordSchema::builder("User")
            .field("id", SchemaType::string())
            .build();

        assert!(documented.same_shape(&bare));
        assert!(!documented.same_shape(&different));
    }

    #[test]
    fn test_strict_build() {
        let schema = user_schema();
        let instance = schema
            .instance()
            .set("name", "ann")
            .unwrap()
            .set("id", 1)
            .unwrap()
            .build()
            .unwrap();

        assert!(instance.is_complete());
        assert_eq!(instance.to_json(), json!({"id": 1, "name": "ann"}));
        let order: Vec<&str> = instance.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["id", "name"]);
    }

    #[test]
    fn test_strict_build_reports_missing_field() {
        let error = user_schema().instance().set("id", 1).unwrap().build().unwrap_err();
        assert_eq!(error, MiyabiError::missing_field("User", "name"));
    }

    #[test]
    fn test_partial_build() {
        let instance = user_schema().instance().set("id", 1).unwrap().build_partial();
        assert!(!instance.is_complete());
        assert!(instance.is_set("id"));
        assert_eq!(instance.missing_fields(), vec!["name"]);
        assert_eq!(instance.to_json(), json!({"id": 1}));
    }

    #[test]
    fn test_set_undeclared_field() {
        let error = user_schema().instance().set("email", "a@b.c").unwrap_err();
        assert!(matches!(error, MiyabiError::Definition { .. }));
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct User {
            id: i64,
            name: String,
        }

        let instance = user_schema()
            .instance()
            .set("id", 5)
            .unwrap()
            .set("name", "bo")
            .unwrap()
            .build()
            .unwrap();

        let user: User = instance.deserialize().unwrap();
        assert_eq!(
            user,
            User {
                id: 5,
                name: "bo".to_string()
            }
        );
    }
}
