//! Response validation and rendering.
//!
//! After a handler runs, its status and parsed body are checked against the
//! response schema declared for that status under the context's operation.
//! A mismatch is a service defect, reported as
//! [`MiyabiError::ResponseValidation`].

use http::StatusCode;
use miyabi_core::{
    validate_record, MiyabiError, MiyabiResult, OperationRegistry, RecordInstance,
    RequestContext, ResponseDefinition,
};

use crate::config::ValidationConfig;

/// Checks handler output against the declared response schema.
///
/// # Errors
///
/// - [`MiyabiError::Definition`] if no operation is bound to `ctx`
/// - [`MiyabiError::UnmappedOperation`] if the bound operation is unknown
/// - [`MiyabiError::UndeclaredStatus`] unless `allow_undeclared_status` is set
/// - [`MiyabiError::ResponseValidation`] on a mismatch, when `enforce_responses` is set
pub fn validate_response(
    registry: &OperationRegistry,
    config: &ValidationConfig,
    ctx: &RequestContext,
    status: StatusCode,
    body: &serde_json::Value,
) -> MiyabiResult<()> {
    if !config.validate_responses {
        return Ok(());
    }

    let operation_id = bound_operation(ctx)?;
    let definition = match find_definition(registry, operation_id, status) {
        Ok(definition) => definition,
        Err(MiyabiError::UndeclaredStatus { .. }) if config.allow_undeclared_status => {
            tracing::debug!(
                operation_id = %operation_id,
                request_id = %ctx.request_id(),
                status = status.as_u16(),
                "response status not declared, skipping validation"
            );
            return Ok(());
        }
        Err(error) => return Err(error),
    };

    let Err(error) = validate_record(definition.schema(), body) else {
        return Ok(());
    };

    tracing::error!(
        operation_id = %operation_id,
        request_id = %ctx.request_id(),
        status = status.as_u16(),
        path = %error.path,
        error = %error.message,
        "response does not match declared schema"
    );
    miyabi_telemetry::metrics::record_response_validation_failure(operation_id, status.as_u16());

    if config.enforce_responses {
        Err(MiyabiError::response_validation(error))
    } else {
        Ok(())
    }
}

/// Projects `instance` onto the response schema declared for `status`.
///
/// Only the fields the response schema declares are kept; each is checked
/// against its declared type.
///
/// # Errors
///
/// The lookup errors of [`validate_response`], or
/// [`MiyabiError::ResponseValidation`] if `instance` lacks a declared field
/// or holds a value of the wrong type.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use miyabi_core::{fixtures, RequestContext};
/// use miyabi_validation::response::render_response;
/// use serde_json::json;
///
/// let registry = fixtures::user_service_registry();
/// let ctx = RequestContext::for_operation("updateUser");
/// let request = fixtures::update_user_schema()
///     .instance()
///     .set("id", 1).unwrap()
///     .set("name", "ann").unwrap()
///     .set("email", "ann@example.com").unwrap()
///     .build()
///     .unwrap();
///
/// let (status, body) = render_response(&registry, &ctx, StatusCode::OK, &request).unwrap();
/// assert_eq!(status, StatusCode::OK);
/// assert_eq!(body, json!({"id": 1, "name": "ann", "email": "ann@example.com"}));
/// ```
pub fn render_response(
    registry: &OperationRegistry,
    ctx: &RequestContext,
    status: StatusCode,
    instance: &RecordInstance,
) -> MiyabiResult<(StatusCode, serde_json::Value)> {
    let operation_id = bound_operation(ctx)?;
    let definition = find_definition(registry, operation_id, status)?;

    let projected = validate_record(definition.schema(), &instance.to_json())
        .map_err(MiyabiError::response_validation)?;

    Ok((status, projected.to_json()))
}

fn bound_operation(ctx: &RequestContext) -> MiyabiResult<&str> {
    ctx.operation_id()
        .ok_or_else(|| MiyabiError::definition("no operation bound to the request context"))
}

fn find_definition<'r>(
    registry: &'r OperationRegistry,
    operation_id: &str,
    status: StatusCode,
) -> MiyabiResult<&'r ResponseDefinition> {
    registry
        .get_view_definition(operation_id)?
        .responses()
        .get(status)
        .ok_or_else(|| MiyabiError::undeclared_status(operation_id, status.as_u16()))
}
