//! Swagger 2.0 document types and export.
//!
//! [`export`] walks an [`OperationRegistry`] in registration order and
//! produces a [`Swagger`] document:
//!
//! - one path item per path template, one operation per lower-cased method
//! - one `path` parameter per field of the path schema
//! - one `body` parameter referencing the body schema's definition
//! - one response per declared status, referencing its schema's definition
//!
//! Export is pure; the same registry always yields the same document.

use std::path::Path;

use indexmap::IndexMap;
use miyabi_core::{OperationRegistry, RecordSchema, RegisteredOperation};
use serde::{Deserialize, Serialize};

use crate::error::DocsResult;

/// Swagger version emitted in every document.
pub const SWAGGER_VERSION: &str = "2.0";

/// Media type listed under `produces`.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Service-level metadata supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// Host (and optional port) serving the API.
    pub host: String,
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Transfer protocols, e.g. `https`.
    pub schemes: Vec<String>,
    /// Path prefix shared by every operation.
    pub base_path: String,
}

impl BasicInfo {
    /// Creates metadata with no schemes and a `/` base path.
    pub fn new(
        host: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            title: title.into(),
            version: version.into(),
            schemes: Vec::new(),
            base_path: "/".to_string(),
        }
    }

    /// Adds a scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into());
        self
    }

    /// Sets the base path.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }
}

/// Swagger document root object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swagger {
    /// Swagger version, always `"2.0"`.
    pub swagger: String,
    /// Host serving the API.
    pub host: String,
    /// API metadata.
    pub info: Info,
    /// Transfer protocols.
    pub schemes: Vec<String>,
    /// Path prefix.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Media types the API produces.
    pub produces: Vec<String>,
    /// Path template to lower-cased method to operation.
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    /// Schema name to object definition.
    pub definitions: IndexMap<String, Definition>,
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Path and body parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Status code to response.
    pub responses: IndexMap<u16, Response>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// URL path parameter.
    Path,
    /// Request body.
    Body,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterIn,
    /// Lower-cased type name, for path parameters.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    /// Whether required.
    pub required: bool,
    /// Referenced definition, for the body parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Reference>,
}

impl Parameter {
    /// A required path parameter.
    pub fn path(name: impl Into<String>, parameter_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterIn::Path,
            parameter_type: Some(parameter_type.into()),
            required: true,
            schema: None,
        }
    }

    /// The required body parameter for `schema_name`.
    pub fn body(schema_name: &str) -> Self {
        Self {
            name: "body".to_string(),
            location: ParameterIn::Body,
            parameter_type: None,
            required: true,
            schema: Some(Reference::definition(schema_name)),
        }
    }
}

/// A `$ref` to another part of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Reference target.
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    /// Reference to `#/definitions/{name}`.
    pub fn definition(name: &str) -> Self {
        Self {
            reference: format!("#/definitions/{name}"),
        }
    }
}

/// Response for one status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Description (required).
    pub description: String,
    /// Referenced definition.
    pub schema: Reference,
}

/// An object definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub definition_type: String,
    /// Field name to property, in declaration order.
    pub properties: IndexMap<String, Property>,
}

impl Definition {
    /// Builds the definition of a record schema.
    pub fn from_schema(schema: &RecordSchema) -> Self {
        let properties = schema
            .fields()
            .iter()
            .map(|field| {
                (
                    field.name().to_string(),
                    Property {
                        property_type: field.schema().type_name().to_ascii_lowercase(),
                    },
                )
            })
            .collect();

        Self {
            definition_type: "object".to_string(),
            properties,
        }
    }
}

/// A definition property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Lower-cased type name.
    #[serde(rename = "type")]
    pub property_type: String,
}

impl Swagger {
    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the document as YAML.
    pub fn to_yaml(&self) -> DocsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the document to `path`.
    ///
    /// A `.json` extension selects JSON; anything else is written as YAML.
    pub fn write_to(&self, path: impl AsRef<Path>) -> DocsResult<()> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        let rendered = if is_json {
            self.to_json()?
        } else {
            self.to_yaml()?
        };
        std::fs::write(path, rendered)?;

        tracing::info!(
            path = %path.display(),
            format = if is_json { "json" } else { "yaml" },
            "swagger document written"
        );
        Ok(())
    }
}

/// Exports every registered operation as a Swagger 2.0 document.
///
/// # Example
///
/// ```
/// use miyabi_core::fixtures;
/// use miyabi_docs::{export, BasicInfo};
///
/// let basic = BasicInfo::new("api.example.com", "Users", "1.0.0").scheme("https");
/// let swagger = export(&basic, &fixtures::user_service_registry());
///
/// assert_eq!(swagger.swagger, "2.0");
/// assert_eq!(swagger.paths["/users/{id}"]["get"].operation_id, "getUser");
/// ```
pub fn export(basic: &BasicInfo, registry: &OperationRegistry) -> Swagger {
    let mut paths: IndexMap<String, IndexMap<String, Operation>> = IndexMap::new();
    let mut definitions = IndexMap::new();

    for registered in registry.operations() {
        let operation = convert_operation(registered, &mut definitions);
        paths
            .entry(registered.path().to_string())
            .or_default()
            .insert(registered.method().as_str().to_ascii_lowercase(), operation);
    }

    Swagger {
        swagger: SWAGGER_VERSION.to_string(),
        host: basic.host.clone(),
        info: Info {
            title: basic.title.clone(),
            version: basic.version.clone(),
        },
        schemes: basic.schemes.clone(),
        base_path: basic.base_path.clone(),
        produces: vec![JSON_MEDIA_TYPE.to_string()],
        paths,
        definitions,
    }
}

fn convert_operation(
    registered: &RegisteredOperation,
    definitions: &mut IndexMap<String, Definition>,
) -> Operation {
    let request = registered.view().request();
    let mut parameters = Vec::new();

    if let Some(path_schema) = request.path_schema() {
        parameters.extend(path_schema.fields().iter().map(|field| {
            Parameter::path(field.name(), field.schema().type_name().to_ascii_lowercase())
        }));
    }

    if let Some(body_schema) = request.body_schema() {
        parameters.push(Parameter::body(body_schema.name()));
        add_definition(definitions, body_schema);
    }

    let responses = registered
        .view()
        .responses()
        .iter()
        .map(|(status, definition)| {
            add_definition(definitions, definition.schema());
            (
                status.as_u16(),
                Response {
                    description: definition.description().to_string(),
                    schema: Reference::definition(definition.schema().name()),
                },
            )
        })
        .collect();

    Operation {
        operation_id: registered.operation_id().to_string(),
        parameters,
        responses,
    }
}

fn add_definition(definitions: &mut IndexMap<String, Definition>, schema: &RecordSchema) {
    let definition = Definition::from_schema(schema);
    if definitions
        .get(schema.name())
        .is_some_and(|previous| *previous != definition)
    {
        tracing::warn!(
            schema = %schema.name(),
            "definition name reused for a different shape, keeping the latest"
        );
    }
    definitions.insert(schema.name().to_string(), definition);
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use miyabi_core::{
        fixtures, RequestDefinition, ResponseDefinition, ResponseDefinitionSet, SchemaType,
        ViewDefinition,
    };
    use serde_json::json;

    fn basic() -> BasicInfo {
        BasicInfo::new("localhost:8080", "User Service", "1.0.0")
            .scheme("http")
            .base_path("/api")
    }

    fn user_swagger() -> Swagger {
        export(&basic(), &fixtures::user_service_registry())
    }

    #[test]
    fn test_envelope() {
        let swagger = user_swagger();
        assert_eq!(swagger.swagger, "2.0");
        assert_eq!(swagger.host, "localhost:8080");
        assert_eq!(swagger.info.title, "User Service");
        assert_eq!(swagger.schemes, vec!["http"]);
        assert_eq!(swagger.base_path, "/api");
        assert_eq!(swagger.produces, vec!["application/json"]);
    }

    #[test]
    fn test_path_parameters() {
        let swagger = user_swagger();
        let operation = &swagger.paths["/users/{id}"]["get"];

        assert_eq!(operation.operation_id, "getUser");
        assert_eq!(operation.parameters, vec![Parameter::path("id", "integer")]);

        let value = serde_json::to_value(&operation.parameters[0]).unwrap();
        assert_eq!(
            value,
            json!({"name": "id", "in": "path", "type": "integer", "required": true})
        );
    }

    #[test]
    fn test_methods_grouped_by_path() {
        let swagger = user_swagger();
        let users = &swagger.paths["/users"];
        assert_eq!(users.keys().collect::<Vec<_>>(), vec!["get", "post"]);

        let by_id = &swagger.paths["/users/{id}"];
        assert_eq!(by_id.keys().collect::<Vec<_>>(), vec!["get", "put"]);
    }

    #[test]
    fn test_body_parameter_and_definition() {
        let swagger = user_swagger();
        let operation = &swagger.paths["/users"]["post"];

        let value = serde_json::to_value(&operation.parameters).unwrap();
        assert_eq!(
            value,
            json!([{
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": "#/definitions/CreateUserRequest"}
            }])
        );

        let definition = serde_json::to_value(&swagger.definitions["CreateUserRequest"]).unwrap();
        assert_eq!(
            definition,
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "email": {"type": "string"}}
            })
        );
    }

    #[test]
    fn test_path_and_body_parameters_in_order() {
        let swagger = user_swagger();
        let parameters = &swagger.paths["/users/{id}"]["put"].parameters;

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].location, ParameterIn::Path);
        assert_eq!(parameters[1].location, ParameterIn::Body);
    }

    #[test]
    fn test_empty_parameters_omitted() {
        let swagger = user_swagger();
        let value = serde_json::to_value(&swagger.paths["/users"]["get"]).unwrap();
        assert!(value.get("parameters").is_none());
    }

    #[test]
    fn test_responses() {
        let swagger = user_swagger();
        let responses = &swagger.paths["/users/{id}"]["get"].responses;

        assert_eq!(responses.keys().copied().collect::<Vec<_>>(), vec![200, 404]);
        assert_eq!(responses[&200].description, "A registered user");
        assert_eq!(responses[&200].schema, Reference::definition("UserResponse"));
        assert_eq!(responses[&404].description, "Error payload");
        assert!(swagger.definitions.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_list_field_type_name() {
        let swagger = user_swagger();
        let list = &swagger.definitions["UserListResponse"];
        assert_eq!(list.properties["users"].property_type, "list");
        assert_eq!(list.properties["total"].property_type, "integer");
    }

    #[test]
    fn test_definition_collision_last_write_wins() {
        let first = RecordSchema::builder("Payload")
            .field("a", SchemaType::integer())
            .build();
        let second = RecordSchema::builder("Payload")
            .field("b", SchemaType::string())
            .build();

        let view = |schema| {
            ViewDefinition::new(
                RequestDefinition::builder(RecordSchema::builder("Empty").build()).build(),
                ResponseDefinitionSet::ok(ResponseDefinition::new(schema)),
            )
        };

        let mut registry = OperationRegistry::new();
        registry.register("first", Method::GET, "/first", view(first));
        registry.register("second", Method::GET, "/second", view(second));

        let swagger = export(&basic(), &registry);
        let payload = &swagger.definitions["Payload"];
        assert!(payload.properties.contains_key("b"));
        assert!(!payload.properties.contains_key("a"));
    }

    #[test]
    fn test_export_is_deterministic() {
        assert_eq!(user_swagger(), user_swagger());
        assert_eq!(user_swagger().to_json().unwrap(), user_swagger().to_json().unwrap());
    }

    #[test]
    fn test_empty_registry() {
        let swagger = export(&basic(), &OperationRegistry::new());
        assert!(swagger.paths.is_empty());
        assert!(swagger.definitions.is_empty());

        let value: serde_json::Value = serde_json::from_str(&swagger.to_json().unwrap()).unwrap();
        assert_eq!(value["paths"], json!({}));
    }

    #[test]
    fn test_yaml_rendering() {
        let yaml = user_swagger().to_yaml().unwrap();
        assert!(yaml.contains("basePath: /api"));
        assert!(yaml.contains("operationId: getUser"));

        let parsed: Swagger = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.swagger, "2.0");
    }

    #[test]
    fn test_json_status_keys() {
        let value: serde_json::Value =
            serde_json::from_str(&user_swagger().to_json().unwrap()).unwrap();
        assert_eq!(
            value["paths"]["/users"]["post"]["responses"]["201"]["schema"]["$ref"],
            "#/definitions/UserResponse"
        );
    }

    #[test]
    fn test_write_to_selects_format() {
        let dir = tempfile::tempdir().unwrap();
        let swagger = user_swagger();

        let yaml_path = dir.path().join("swagger.yaml");
        swagger.write_to(&yaml_path).unwrap();
        let yaml = std::fs::read_to_string(&yaml_path).unwrap();
        let parsed: Swagger = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, swagger);

        let json_path = dir.path().join("swagger.JSON");
        swagger.write_to(&json_path).unwrap();
        let json = std::fs::read_to_string(&json_path).unwrap();
        let parsed: Swagger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, swagger);
    }
}
