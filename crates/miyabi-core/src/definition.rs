//! Request and response contracts of an operation.
//!
//! A [`ViewDefinition`] pairs one [`RequestDefinition`] with a
//! [`ResponseDefinitionSet`]. The request side names the canonical request
//! schema and the partial schemas (path parameters, body) it is assembled
//! from; the response side maps status codes to response schemas.
//!
//! # Example
//!
//! ```
//! use miyabi_core::{
//!     RecordSchema, RequestDefinition, ResponseDefinition, ResponseDefinitionSet, SchemaType,
//!     ViewDefinition,
//! };
//!
//! let path = RecordSchema::builder("UserPath").field("id", SchemaType::integer()).build();
//! let user = RecordSchema::builder("UserResponse")
//!     .field("id", SchemaType::integer())
//!     .field("name", SchemaType::string())
//!     .build();
//!
//! let view = ViewDefinition::new(
//!     RequestDefinition::builder(path.clone()).path_schema(path).build(),
//!     ResponseDefinitionSet::ok(ResponseDefinition::new(user)),
//! );
//!
//! assert!(view.request().check().is_ok());
//! assert!(view.responses().find_by_status_code(200).is_some());
//! assert!(view.responses().find_by_status_code(404).is_none());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use indexmap::IndexMap;

use crate::error::{MiyabiError, MiyabiResult};
use crate::record::RecordSchema;
use crate::schema::SchemaType;

/// Media type accepted when none is declared.
pub const DEFAULT_CONSUMES: &str = "application/json";

/// Request side of an operation's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefinition {
    consumes: Vec<String>,
    schema: Arc<RecordSchema>,
    path_schema: Option<Arc<RecordSchema>>,
    body_schema: Option<Arc<RecordSchema>>,
}

impl RequestDefinition {
    /// Starts a request definition whose canonical schema is `schema`.
    #[must_use]
    pub fn builder(schema: Arc<RecordSchema>) -> RequestDefinitionBuilder {
        RequestDefinitionBuilder::new(schema)
    }

    /// Returns the accepted media types.
    #[must_use]
    pub fn consumes(&self) -> &[String] {
        &self.consumes
    }

    /// Returns the canonical request schema.
    #[must_use]
    pub const fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Returns the path parameter schema, if declared.
    #[must_use]
    pub const fn path_schema(&self) -> Option<&Arc<RecordSchema>> {
        self.path_schema.as_ref()
    }

    /// Returns the body schema, if declared.
    #[must_use]
    pub const fn body_schema(&self) -> Option<&Arc<RecordSchema>> {
        self.body_schema.as_ref()
    }

    /// Returns the declared partial schemas, path first.
    pub fn partial_schemas(&self) -> impl Iterator<Item = &Arc<RecordSchema>> {
        self.path_schema.iter().chain(self.body_schema.iter())
    }

    /// Checks that the partial schemas can assemble the canonical schema.
    ///
    /// Partial schemas must not declare the same field twice, every
    /// canonical field must come from exactly one partial schema, and that
    /// field must have the same type in both.
    pub fn check(&self) -> MiyabiResult<()> {
        let mut sources: HashMap<&str, (&str, &SchemaType)> = HashMap::new();
        for partial in self.partial_schemas() {
            for field in partial.fields() {
                if let Some((other, _)) =
                    sources.insert(field.name(), (partial.name(), field.schema()))
                {
                    return Err(MiyabiError::definition(format!(
                        "field '{}' is declared by both '{}' and '{}'",
                        field.name(),
                        other,
                        partial.name()
                    )));
                }
            }
        }

        for field in self.schema.fields() {
            match sources.get(field.name()) {
                None => {
                    return Err(MiyabiError::definition(format!(
                        "field '{}' of '{}' is not supplied by the path or body schema",
                        field.name(),
                        self.schema.name()
                    )));
                }
                Some((partial, schema)) if *schema != field.schema() => {
                    return Err(MiyabiError::definition(format!(
                        "field '{}' is {} in '{}' but {} in '{}'",
                        field.name(),
                        schema.type_name(),
                        partial,
                        field.schema().type_name(),
                        self.schema.name()
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Builder for [`RequestDefinition`].
#[derive(Debug)]
pub struct RequestDefinitionBuilder {
    consumes: Vec<String>,
    schema: Arc<RecordSchema>,
    path_schema: Option<Arc<RecordSchema>>,
    body_schema: Option<Arc<RecordSchema>>,
}

impl RequestDefinitionBuilder {
    /// Creates a builder for the canonical `schema`.
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self {
            consumes: Vec::new(),
            schema,
            path_schema: None,
            body_schema: None,
        }
    }

    /// Adds an accepted media type.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.push(media_type.into());
        self
    }

    /// Sets the path parameter schema.
    #[must_use]
    pub fn path_schema(mut self, schema: Arc<RecordSchema>) -> Self {
        self.path_schema = Some(schema);
        self
    }

    /// Sets the body schema.
    #[must_use]
    pub fn body_schema(mut self, schema: Arc<RecordSchema>) -> Self {
        self.body_schema = Some(schema);
        self
    }

    /// Builds the definition. Accepts `application/json` unless told otherwise.
    #[must_use]
    pub fn build(self) -> RequestDefinition {
        let consumes = if self.consumes.is_empty() {
            vec![DEFAULT_CONSUMES.to_string()]
        } else {
            self.consumes
        };

        RequestDefinition {
            consumes,
            schema: self.schema,
            path_schema: self.path_schema,
            body_schema: self.body_schema,
        }
    }
}

/// A response schema and its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDefinition {
    schema: Arc<RecordSchema>,
    description: String,
}

impl ResponseDefinition {
    /// Creates a response definition described by the schema's own text.
    #[must_use]
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let description = schema.description().unwrap_or_default().to_string();
        Self {
            schema,
            description,
        }
    }

    /// Overrides the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the response schema.
    #[must_use]
    pub const fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Status code to response definition, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDefinitionSet {
    definitions: IndexMap<StatusCode, ResponseDefinition>,
}

impl ResponseDefinitionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set declaring only `200 OK`.
    #[must_use]
    pub fn ok(definition: ResponseDefinition) -> Self {
        Self::new().with(StatusCode::OK, definition)
    }

    /// Declares `definition` for `status`, replacing any earlier one.
    #[must_use]
    pub fn with(mut self, status: StatusCode, definition: ResponseDefinition) -> Self {
        self.insert(status, definition);
        self
    }

    /// Declares `definition` for `status`, returning the replaced one.
    pub fn insert(
        &mut self,
        status: StatusCode,
        definition: ResponseDefinition,
    ) -> Option<ResponseDefinition> {
        self.definitions.insert(status, definition)
    }

    /// Looks up the definition for `status`.
    #[must_use]
    pub fn get(&self, status: StatusCode) -> Option<&ResponseDefinition> {
        self.definitions.get(&status)
    }

    /// Looks up the definition for a numeric status code.
    #[must_use]
    pub fn find_by_status_code(&self, status: u16) -> Option<&ResponseDefinition> {
        StatusCode::from_u16(status)
            .ok()
            .and_then(|status| self.get(status))
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (StatusCode, &ResponseDefinition)> {
        self.definitions
            .iter()
            .map(|(status, definition)| (*status, definition))
    }

    /// Returns the number of declared statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if no status is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// The full contract of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDefinition {
    request: RequestDefinition,
    responses: ResponseDefinitionSet,
}

impl ViewDefinition {
    /// Creates a view definition.
    #[must_use]
    pub const fn new(request: RequestDefinition, responses: ResponseDefinitionSet) -> Self {
        Self { request, responses }
    }

    /// Returns the request definition.
    #[must_use]
    pub const fn request(&self) -> &RequestDefinition {
        &self.request
    }

    /// Returns the response definitions.
    #[must_use]
    pub const fn responses(&self) -> &ResponseDefinitionSet {
        &self.responses
    }
}
