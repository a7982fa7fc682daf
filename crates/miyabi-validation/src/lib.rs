//! Contract validation for Miyabi.
//!
//! This crate enforces the request and response contracts declared in an
//! [`OperationRegistry`]:
//!
//! - [`extract`] - validates path captures and the parsed body against their
//!   partial schemas
//! - [`pipeline`] - runs the extractors and combines their results into the
//!   canonical request instance
//! - [`response`] - checks handler output against the schema declared for
//!   its status, and renders record instances as response bodies
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use http::StatusCode;
//! use miyabi_core::{fixtures, RequestContext, SchemaValue};
//! use miyabi_validation::{ContractValidator, ValidationConfig};
//! use serde_json::json;
//!
//! let validator = ContractValidator::new(
//!     Arc::new(fixtures::user_service_registry()),
//!     ValidationConfig::default(),
//! );
//!
//! let mut ctx = RequestContext::for_operation("getUser");
//! let captures = HashMap::from([("id".to_string(), "42".to_string())]);
//! validator.validate_request(&mut ctx, &captures, &json!(null)).unwrap();
//! assert_eq!(ctx.request_schema().unwrap().get("id"), Some(&SchemaValue::Integer(42)));
//!
//! let body = json!({"id": 42, "name": "ann", "email": "ann@example.com"});
//! validator.validate_response(&ctx, StatusCode::OK, &body).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod extract;
pub mod pipeline;
pub mod response;

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use miyabi_core::{MiyabiError, MiyabiResult, OperationRegistry, RecordInstance, RequestContext};

pub use config::ValidationConfig;
pub use extract::{validate_body_schema, validate_path_schema};
pub use pipeline::{PipelineState, RequestPipeline};
pub use response::{render_response, validate_response};

/// Validates requests and responses against a frozen registry.
#[derive(Debug, Clone)]
pub struct ContractValidator {
    registry: Arc<OperationRegistry>,
    config: ValidationConfig,
}

impl ContractValidator {
    /// Creates a validator over `registry`.
    pub fn new(registry: Arc<OperationRegistry>, config: ValidationConfig) -> Self {
        Self { registry, config }
    }

    /// Creates a validator with default configuration.
    pub fn with_defaults(registry: Arc<OperationRegistry>) -> Self {
        Self::new(registry, ValidationConfig::default())
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates the request and attaches the canonical instance to `ctx`.
    ///
    /// # Errors
    ///
    /// [`MiyabiError::Definition`] if `ctx` has no operation bound,
    /// [`MiyabiError::UnmappedOperation`] if the operation is unknown, and
    /// any error raised by [`RequestPipeline::run`].
    pub fn validate_request(
        &self,
        ctx: &mut RequestContext,
        path_captures: &HashMap<String, String>,
        body: &serde_json::Value,
    ) -> MiyabiResult<()> {
        if !self.config.validate_requests {
            return Ok(());
        }

        let operation_id = ctx
            .operation_id()
            .ok_or_else(|| MiyabiError::definition("no operation bound to the request context"))?
            .to_string();
        let view = self.registry.get_view_definition(&operation_id)?;

        let mut pipeline = RequestPipeline::new(&operation_id, view.request(), &self.config);
        match pipeline.run(path_captures, body) {
            Ok(instance) => {
                miyabi_telemetry::metrics::record_request_validated(&operation_id);
                ctx.set_request_schema(instance);
                Ok(())
            }
            Err(error) => {
                tracing::info!(
                    operation_id = %operation_id,
                    request_id = %ctx.request_id(),
                    state = %pipeline.state(),
                    error = %error,
                    "request validation failed"
                );
                miyabi_telemetry::metrics::record_request_validation_failure(&operation_id);
                Err(error)
            }
        }
    }

    /// Checks handler output. See [`response::validate_response`].
    pub fn validate_response(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
        body: &serde_json::Value,
    ) -> MiyabiResult<()> {
        validate_response(&self.registry, &self.config, ctx, status, body)
    }

    /// Renders `instance` as the body for `status`. See [`response::render_response`].
    pub fn render_response(
        &self,
        ctx: &RequestContext,
        status: StatusCode,
        instance: &RecordInstance,
    ) -> MiyabiResult<(StatusCode, serde_json::Value)> {
        render_response(&self.registry, ctx, status, instance)
    }
}
