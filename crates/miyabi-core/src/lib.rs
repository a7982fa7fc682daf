//! # Miyabi Core
//!
//! Core types for the Miyabi contract layer.
//!
//! This crate provides the pieces every other Miyabi crate builds on:
//!
//! - [`SchemaType`] - Closed schema vocabulary (scalar, list, record)
//! - [`RecordSchema`] - Named, ordered, typed field sets (the DTO shape)
//! - [`validate()`] - Recursive structural validation of raw JSON
//! - [`combine_schemas`] - Merge of partial record instances into a canonical one
//! - [`ViewDefinition`] - Request and response contract of one operation
//! - [`OperationRegistry`] - Operation id to method, path and contract
//! - [`RequestContext`] - Per-request state threaded through the hooks
//! - [`MiyabiError`] - Error taxonomy shared by all crates
//!
//! # Example
//!
//! ```
//! use miyabi_core::{validate, RecordSchema, SchemaType, SchemaValue};
//! use serde_json::json;
//!
//! let user = RecordSchema::builder("UserResponse")
//!     .field("id", SchemaType::integer())
//!     .field("name", SchemaType::string())
//!     .build();
//!
//! let instance = validate(&SchemaType::record(user), &json!({"id": "7", "name": "x"})).unwrap();
//! let record = instance.as_record().unwrap();
//! assert_eq!(record.get("id"), Some(&SchemaValue::Integer(7)));
//! ```

#![doc(html_root_url = "https://docs.rs/miyabi-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod combine;
mod context;
pub mod definition;
mod error;
pub mod fixtures;
mod record;
mod registry;
pub mod schema;
mod validate;

pub use combine::combine_schemas;
pub use context::{RequestContext, RequestId};
pub use definition::{
    RequestDefinition, RequestDefinitionBuilder, ResponseDefinition, ResponseDefinitionSet,
    ViewDefinition,
};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, MiyabiError, MiyabiResult};
pub use record::{FieldDef, InstanceBuilder, RecordInstance, RecordSchema, RecordSchemaBuilder};
pub use registry::{OperationRegistry, PathMatch, RegisteredOperation};
pub use schema::{ListType, ScalarType, SchemaType, SchemaValue};
pub use validate::{validate, validate_at_path, validate_record, ValidationError, ROOT_PATH};
