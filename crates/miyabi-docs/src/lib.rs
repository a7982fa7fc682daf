//! # Miyabi Docs
//!
//! Swagger 2.0 documentation for Miyabi services.
//!
//! The document is derived entirely from the [`OperationRegistry`]: every
//! registered operation contributes its path, method, parameters and
//! responses, and every schema it references becomes a definition.
//!
//! ## Quick Start
//!
//! ```
//! use miyabi_core::fixtures;
//! use miyabi_docs::{export, BasicInfo};
//!
//! let basic = BasicInfo::new("localhost:8080", "User Service", "1.0.0")
//!     .scheme("http")
//!     .base_path("/");
//!
//! let swagger = export(&basic, &fixtures::user_service_registry());
//! let yaml = swagger.to_yaml().unwrap();
//! assert!(yaml.contains("operationId: createUser"));
//! ```
//!
//! [`OperationRegistry`]: miyabi_core::OperationRegistry

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod swagger;

pub use error::{DocsError, DocsResult};
pub use swagger::{
    export, BasicInfo, Definition, Info, Operation, Parameter, ParameterIn, Property, Reference,
    Response, Swagger, JSON_MEDIA_TYPE, SWAGGER_VERSION,
};
