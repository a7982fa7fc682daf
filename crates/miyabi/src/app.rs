//! The frozen application and its per-request hooks.
//!
//! A host drives one request through [`MiyabiApp`] in this order:
//!
//! ```text
//! route → before_dispatch → (handler) → render_response / after_handler
//!                ↓ error                          ↓ error
//!          error_response                   error_response
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::{Method, StatusCode};
use miyabi_core::{MiyabiError, MiyabiResult, OperationRegistry, RecordInstance, RequestContext};
use miyabi_docs::{BasicInfo, DocsResult, Swagger};
use miyabi_validation::ContractValidator;

/// A request matched to a registered operation.
#[derive(Debug, Clone)]
pub struct RoutedRequest {
    /// Fresh context bound to the matched operation.
    pub context: RequestContext,
    /// Parameter name to raw path segment.
    pub captures: HashMap<String, String>,
}

/// Validates traffic against a frozen operation registry.
///
/// Cloning is cheap; clones share the registry.
#[derive(Debug, Clone)]
pub struct MiyabiApp {
    validator: ContractValidator,
    basic: BasicInfo,
    swagger_path: PathBuf,
}

impl MiyabiApp {
    pub(crate) fn new(validator: ContractValidator, basic: BasicInfo, swagger_path: PathBuf) -> Self {
        Self {
            validator,
            basic,
            swagger_path,
        }
    }

    /// Returns the frozen registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        self.validator.registry()
    }

    /// Returns the validator.
    #[must_use]
    pub const fn validator(&self) -> &ContractValidator {
        &self.validator
    }

    /// Returns the configured Swagger metadata.
    #[must_use]
    pub const fn basic_info(&self) -> &BasicInfo {
        &self.basic
    }

    /// Matches `method` and a concrete `path` to an operation.
    ///
    /// Returns `None` when no registered operation serves the request.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RoutedRequest> {
        let matched = self.registry().resolve(method, path)?;
        Some(RoutedRequest {
            context: RequestContext::for_operation(matched.operation.operation_id()),
            captures: matched.captures,
        })
    }

    /// Pre-dispatch hook: validates the request and attaches the canonical
    /// instance to `ctx`.
    ///
    /// # Errors
    ///
    /// See [`ContractValidator::validate_request`].
    pub fn before_dispatch(
        &self,
        ctx: &mut RequestContext,
        path_captures: &HashMap<String, String>,
        body: &serde_json::Value,
    ) -> MiyabiResult<()> {
        self.validator.validate_request(ctx, path_captures, body)
    }

    /// Post-handler hook: checks the handler's status and body.
    ///
    /// # Errors
    ///
    /// See [`miyabi_validation::validate_response`].
    pub fn after_handler(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
        body: &serde_json::Value,
    ) -> MiyabiResult<()> {
        self.validator.validate_response(ctx, status, body)
    }

    /// Renders `instance` as the response body for `status`.
    ///
    /// # Errors
    ///
    /// See [`miyabi_validation::render_response`].
    pub fn render_response(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
        instance: &RecordInstance,
    ) -> MiyabiResult<(StatusCode, serde_json::Value)> {
        self.validator.render_response(ctx, status, instance)
    }

    /// Renders `error` as a status and JSON envelope carrying the request id.
    #[must_use]
    pub fn error_response(
        &self,
        ctx: &RequestContext,
        error: &MiyabiError,
    ) -> (StatusCode, serde_json::Value) {
        let request_id = ctx.request_id().to_string();
        let envelope = error.to_envelope(Some(&request_id));
        (
            error.status_code(),
            serde_json::to_value(envelope).unwrap_or_default(),
        )
    }

    /// Exports the registry as a Swagger document.
    #[must_use]
    pub fn generate_swagger(&self, basic: &BasicInfo) -> Swagger {
        miyabi_docs::export(basic, self.registry())
    }

    /// Writes the Swagger document to `path`: JSON for `.json`, YAML otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DocsError` if rendering or writing fails.
    pub fn write_swagger(&self, basic: &BasicInfo, path: impl AsRef<Path>) -> DocsResult<()> {
        self.generate_swagger(basic).write_to(path)
    }

    /// Writes the document with the configured metadata to the configured path.
    ///
    /// # Errors
    ///
    /// Returns `DocsError` if rendering or writing fails.
    pub fn write_configured_swagger(&self) -> DocsResult<()> {
        self.write_swagger(&self.basic, &self.swagger_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Miyabi;
    use miyabi_core::{fixtures, SchemaValue};
    use serde_json::json;

    fn app() -> MiyabiApp {
        let mut miyabi = Miyabi::new();
        miyabi
            .add_route("getUser", Method::GET, "/users/{id}", fixtures::get_user_view())
            .unwrap()
            .add_route("listUsers", Method::GET, "/users", fixtures::list_users_view())
            .unwrap();
        miyabi.build()
    }

    #[test]
    fn test_route_binds_operation() {
        let app = app();
        let routed = app.route(&Method::GET, "/users/9").unwrap();

        assert_eq!(routed.context.operation_id(), Some("getUser"));
        assert_eq!(routed.captures["id"], "9");
        assert!(app.route(&Method::DELETE, "/users/9").is_none());
    }

    #[test]
    fn test_before_dispatch_attaches_instance() {
        let app = app();
        let mut routed = app.route(&Method::GET, "/users/9").unwrap();

        app.before_dispatch(&mut routed.context, &routed.captures, &json!(null))
            .unwrap();
        assert_eq!(
            routed.context.request_schema().unwrap().get("id"),
            Some(&SchemaValue::Integer(9))
        );
    }

    #[test]
    fn test_error_response_envelope() {
        let app = app();
        let mut routed = app.route(&Method::GET, "/users/abc").unwrap();

        let error = app
            .before_dispatch(&mut routed.context, &routed.captures, &json!(null))
            .unwrap_err();
        let (status, body) = app.error_response(&routed.context, &error);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"]["path"], "$.id");
        assert_eq!(
            body["request_id"],
            routed.context.request_id().to_string()
        );
    }

    #[test]
    fn test_generate_swagger_covers_registry() {
        let app = app();
        let swagger = app.generate_swagger(app.basic_info());

        assert_eq!(swagger.paths.len(), 2);
        assert_eq!(swagger.info.title, "Miyabi API");
    }

    #[test]
    fn test_clones_share_registry() {
        let app = app();
        let clone = app.clone();
        assert!(Arc::ptr_eq(app.registry(), clone.registry()));
    }
}
