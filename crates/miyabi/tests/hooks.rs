//! End-to-end hook flow for a small order service.

use std::sync::Arc;

use http::{Method, StatusCode};
use miyabi::prelude::*;
use serde_json::json;

fn order_path() -> Arc<RecordSchema> {
    RecordSchema::builder("OrderPath")
        .field("user_id", SchemaType::integer())
        .build()
}

fn order_body() -> Arc<RecordSchema> {
    RecordSchema::builder("OrderBody")
        .field("item_ids", SchemaType::list(SchemaType::integer()))
        .field("quantity", SchemaType::integer())
        .build()
}

fn place_order() -> Arc<RecordSchema> {
    RecordSchema::builder("PlaceOrder")
        .field("user_id", SchemaType::integer())
        .field("item_ids", SchemaType::list(SchemaType::integer()))
        .field("quantity", SchemaType::integer())
        .build()
}

fn order_response() -> Arc<RecordSchema> {
    RecordSchema::builder("OrderResponse")
        .description("An accepted order")
        .field("order_id", SchemaType::integer())
        .field("user_id", SchemaType::integer())
        .build()
}

fn place_order_view() -> ViewDefinition {
    ViewDefinition::new(
        RequestDefinition::builder(place_order())
            .path_schema(order_path())
            .body_schema(order_body())
            .build(),
        ResponseDefinitionSet::new()
            .with(StatusCode::CREATED, ResponseDefinition::new(order_response())),
    )
}

fn app(validation: ValidationConfig) -> MiyabiApp {
    let mut miyabi = Miyabi::new().with_validation(validation);
    miyabi
        .add_route(
            "placeOrder",
            Method::POST,
            "/users/{user_id}/orders",
            place_order_view(),
        )
        .unwrap();
    miyabi.build()
}

#[test]
fn test_request_is_combined_from_path_and_body() {
    let app = app(ValidationConfig::development());
    let mut request = app.route(&Method::POST, "/users/12/orders").unwrap();

    app.before_dispatch(
        &mut request.context,
        &request.captures,
        &json!({"item_ids": [4, "5"], "quantity": "2"}),
    )
    .unwrap();

    let instance = request.context.request_schema().unwrap();
    assert_eq!(instance.name(), "PlaceOrder");
    assert_eq!(
        instance.to_json(),
        json!({"user_id": 12, "item_ids": [4, 5], "quantity": 2})
    );
}

#[test]
fn test_invalid_list_element_reports_path() {
    let app = app(ValidationConfig::development());
    let mut request = app.route(&Method::POST, "/users/12/orders").unwrap();

    let error = app
        .before_dispatch(
            &mut request.context,
            &request.captures,
            &json!({"item_ids": [1, 2, "three"], "quantity": 1}),
        )
        .unwrap_err();

    let (status, body) = app.error_response(&request.context, &error);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["path"], "$.item_ids[2]");
    assert!(request.context.request_schema().is_none());
}

#[test]
fn test_missing_body_field_fails_at_combine() {
    let app = app(ValidationConfig::development());
    let mut request = app.route(&Method::POST, "/users/12/orders").unwrap();

    let error = app
        .before_dispatch(&mut request.context, &request.captures, &json!({"item_ids": []}))
        .unwrap_err();

    assert_eq!(error, MiyabiError::missing_field("PlaceOrder", "quantity"));
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_response_violation_enforced_in_development() {
    let app = app(ValidationConfig::development());
    let request = app.route(&Method::POST, "/users/12/orders").unwrap();

    let ok = json!({"order_id": 1, "user_id": 12});
    app.after_handler(&request.context, StatusCode::CREATED, &ok)
        .unwrap();

    let error = app
        .after_handler(&request.context, StatusCode::CREATED, &json!({"order_id": 1}))
        .unwrap_err();
    assert!(error.is_validation());
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_response_violation_logged_only_in_production() {
    let app = app(ValidationConfig::production());
    let request = app.route(&Method::POST, "/users/12/orders").unwrap();

    assert!(app
        .after_handler(&request.context, StatusCode::CREATED, &json!({"order_id": 1}))
        .is_ok());
    assert!(app
        .after_handler(&request.context, StatusCode::ACCEPTED, &json!({}))
        .is_ok());
}

#[test]
fn test_undeclared_status_in_development() {
    let app = app(ValidationConfig::development());
    let request = app.route(&Method::POST, "/users/12/orders").unwrap();

    let error = app
        .after_handler(&request.context, StatusCode::OK, &json!({}))
        .unwrap_err();
    assert_eq!(error, MiyabiError::undeclared_status("placeOrder", 200));
}

#[test]
fn test_render_response_projects_declared_fields() {
    let app = app(ValidationConfig::development());
    let request = app.route(&Method::POST, "/users/12/orders").unwrap();

    let stored = RecordSchema::builder("StoredOrder")
        .field("order_id", SchemaType::integer())
        .field("user_id", SchemaType::integer())
        .field("internal_note", SchemaType::string())
        .build();
    let order = stored
        .instance()
        .set("order_id", 77)
        .unwrap()
        .set("user_id", 12)
        .unwrap()
        .set("internal_note", "priority")
        .unwrap()
        .build()
        .unwrap();

    let (status, body) = app
        .render_response(&request.context, StatusCode::CREATED, &order)
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"order_id": 77, "user_id": 12}));
}

#[test]
fn test_unknown_route() {
    let app = app(ValidationConfig::development());
    assert!(app.route(&Method::GET, "/users/12/orders").is_none());
    assert!(app.route(&Method::POST, "/users/12").is_none());
}
