//! # Miyabi
//!
//! **Contract-first request and response validation for HTTP services**
//!
//! Every operation declares its contract up front: which record schema the
//! path parameters fill, which the body fills, the canonical schema the
//! handler receives, and one response schema per status code. Miyabi then:
//!
//! - validates and coerces each request before dispatch, handing the
//!   handler one typed [`RecordInstance`](miyabi_core::RecordInstance)
//! - checks each response against the schema declared for its status
//! - exports the whole registry as a Swagger 2.0 document
//!
//! ## Quick Start
//!
//! ```
//! use http::{Method, StatusCode};
//! use miyabi::prelude::*;
//! use miyabi_core::fixtures;
//! use serde_json::json;
//!
//! let mut miyabi = Miyabi::new();
//! miyabi.add_route("getUser", Method::GET, "/users/{id}", fixtures::get_user_view())?;
//! let app = miyabi.build();
//!
//! let mut request = app.route(&Method::GET, "/users/42").unwrap();
//! app.before_dispatch(&mut request.context, &request.captures, &json!(null))?;
//!
//! let body = json!({"id": 42, "name": "ann", "email": "ann@example.com"});
//! app.after_handler(&request.context, StatusCode::OK, &body)?;
//! # Ok::<(), miyabi::AppError>(())
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! startup:  ConfigLoader → Miyabi::add_route* → Miyabi::build → MiyabiApp
//! request:  route → before_dispatch → handler → after_handler
//! ```

#![doc(html_root_url = "https://docs.rs/miyabi/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod builder;
pub mod config;
mod error;

pub use app::{MiyabiApp, RoutedRequest};
pub use builder::Miyabi;
pub use error::{AppError, AppResult};

// Re-export core types
pub use miyabi_core as core;

// Re-export validation types
pub use miyabi_validation as validation;

// Re-export documentation types
pub use miyabi_docs as docs;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use miyabi::prelude::*;
///
/// let schema = RecordSchema::builder("UserIdPath")
///     .field("id", SchemaType::integer())
///     .build();
/// assert!(schema.has_field("id"));
/// ```
pub mod prelude {
    pub use crate::{AppError, AppResult, Miyabi, MiyabiApp, RoutedRequest};

    pub use miyabi_core::{
        MiyabiError, MiyabiResult, RecordInstance, RecordSchema, RequestContext,
        RequestDefinition, ResponseDefinition, ResponseDefinitionSet, SchemaType, SchemaValue,
        ViewDefinition,
    };

    pub use miyabi_config::{ConfigLoader, MiyabiConfig};
    pub use miyabi_docs::{BasicInfo, Swagger};
    pub use miyabi_validation::ValidationConfig;
}
