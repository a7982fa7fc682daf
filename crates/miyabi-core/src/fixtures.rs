//! Test fixtures for Miyabi development and testing.
//!
//! This module provides pre-built schemas, view definitions and a registry
//! that can be used in tests across the Miyabi crates.
//!
//! # Example
//!
//! ```
//! use miyabi_core::fixtures;
//!
//! let registry = fixtures::user_service_registry();
//! assert!(registry.get("getUser").is_some());
//! ```

use std::sync::Arc;

use http::{Method, StatusCode};

use crate::definition::{
    RequestDefinition, ResponseDefinition, ResponseDefinitionSet, ViewDefinition,
};
use crate::record::RecordSchema;
use crate::registry::OperationRegistry;
use crate::schema::SchemaType;

/// Creates a registry for a small user service.
///
/// - `getUser` - GET /users/{id}
/// - `listUsers` - GET /users
/// - `createUser` - POST /users
/// - `updateUser` - PUT /users/{id}
///
/// # Example
///
/// ```
/// use miyabi_core::fixtures::user_service_registry;
///
/// let registry = user_service_registry();
/// assert_eq!(registry.len(), 4);
/// ```
#[must_use]
pub fn user_service_registry() -> OperationRegistry {
    let mut registry = OperationRegistry::new();
    registry.register("getUser", Method::GET, "/users/{id}", get_user_view());
    registry.register("listUsers", Method::GET, "/users", list_users_view());
    registry.register("createUser", Method::POST, "/users", create_user_view());
    registry.register("updateUser", Method::PUT, "/users/{id}", update_user_view());
    registry
}

/// `GET /users/{id}`: path `{id}`, responds 200 with a user.
#[must_use]
pub fn get_user_view() -> ViewDefinition {
    ViewDefinition::new(
        RequestDefinition::builder(user_id_schema())
            .path_schema(user_id_schema())
            .build(),
        ResponseDefinitionSet::ok(ResponseDefinition::new(user_schema()))
            .with(StatusCode::NOT_FOUND, ResponseDefinition::new(error_schema())),
    )
}

/// `GET /users`: no input, responds 200 with a user list.
#[must_use]
pub fn list_users_view() -> ViewDefinition {
    ViewDefinition::new(
        RequestDefinition::builder(RecordSchema::builder("ListUsersRequest").build()).build(),
        ResponseDefinitionSet::ok(ResponseDefinition::new(user_list_schema())),
    )
}

/// `POST /users`: body `{name, email}`, responds 201 with a user.
#[must_use]
pub fn create_user_view() -> ViewDefinition {
    ViewDefinition::new(
        RequestDefinition::builder(create_user_schema())
            .body_schema(create_user_schema())
            .build(),
        ResponseDefinitionSet::new()
            .with(StatusCode::CREATED, ResponseDefinition::new(user_schema())),
    )
}

/// `PUT /users/{id}`: path `{id}` plus body `{name, email}`.
#[must_use]
pub fn update_user_view() -> ViewDefinition {
    ViewDefinition::new(
        RequestDefinition::builder(update_user_schema())
            .path_schema(user_id_schema())
            .body_schema(create_user_schema())
            .build(),
        ResponseDefinitionSet::ok(ResponseDefinition::new(user_schema())),
    )
}

/// `{id: Integer}`
#[must_use]
pub fn user_id_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("UserIdPath")
        .field("id", SchemaType::integer())
        .build()
}

/// `{id: Integer, name: String, email: String}`
#[must_use]
pub fn user_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("UserResponse")
        .description("A registered user")
        .field("id", SchemaType::integer())
        .field("name", SchemaType::string())
        .field("email", SchemaType::string())
        .build()
}

/// `{users: List(UserResponse), total: Integer}`
#[must_use]
pub fn user_list_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("UserListResponse")
        .description("A page of users")
        .field("users", SchemaType::list(SchemaType::record(user_schema())))
        .field("total", SchemaType::integer())
        .build()
}

/// `{name: String, email: String}`
#[must_use]
pub fn create_user_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("CreateUserRequest")
        .field("name", SchemaType::string())
        .field("email", SchemaType::string())
        .build()
}

/// `{id: Integer, name: String, email: String}`
#[must_use]
pub fn update_user_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("UpdateUserRequest")
        .field("id", SchemaType::integer())
        .field("name", SchemaType::string())
        .field("email", SchemaType::string())
        .build()
}

/// `{code: String, message: String}`
#[must_use]
pub fn error_schema() -> Arc<RecordSchema> {
    RecordSchema::builder("ErrorResponse")
        .description("Error payload")
        .field("code", SchemaType::string())
        .field("message", SchemaType::string())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_request_definitions_are_consistent() {
        for operation in user_service_registry().operations() {
            assert!(
                operation.view().request().check().is_ok(),
                "{} has an inconsistent request definition",
                operation.operation_id()
            );
        }
    }

    #[test]
    fn test_get_user_declares_not_found() {
        let view = get_user_view();
        assert_eq!(
            view.responses().find_by_status_code(404).unwrap().description(),
            "Error payload"
        );
    }
}
