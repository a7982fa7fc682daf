//! Operation registry.
//!
//! The [`OperationRegistry`] binds an operation id to its HTTP method, path
//! template and [`ViewDefinition`]. It is populated once at startup and then
//! only read.
//!
//! # Example
//!
//! ```
//! use http::Method;
//! use miyabi_core::fixtures;
//!
//! let registry = fixtures::user_service_registry();
//!
//! let matched = registry.resolve(&Method::GET, "/users/42").unwrap();
//! assert_eq!(matched.operation.operation_id(), "getUser");
//! assert_eq!(matched.captures["id"], "42");
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;

use http::Method;
use indexmap::IndexMap;

use crate::definition::ViewDefinition;
use crate::error::{MiyabiError, MiyabiResult};

/// A segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Parameter(String),
}

/// An operation bound in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredOperation {
    operation_id: String,
    method: Method,
    path: String,
    segments: Vec<PathSegment>,
    view: ViewDefinition,
}

impl RegisteredOperation {
    fn new(operation_id: String, method: Method, path: String, view: ViewDefinition) -> Self {
        let segments = parse_path(&path);
        Self {
            operation_id,
            method,
            path,
            segments,
            view,
        }
    }

    /// Returns the operation id.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template (e.g. `/users/{id}`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the contract.
    #[must_use]
    pub const fn view(&self) -> &ViewDefinition {
        &self.view
    }

    /// Returns the parameter names of the path template, in order.
    pub fn path_parameters(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Parameter(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }

    /// Matches a concrete request path against the template.
    ///
    /// Returns the raw path captures on a match.
    #[must_use]
    pub fn match_path(&self, request_path: &str) -> Option<HashMap<String, String>> {
        let request_segments: Vec<&str> = split_path(request_path).collect();

        if request_segments.len() != self.segments.len() {
            return None;
        }

        let mut captures = HashMap::new();
        for (pattern, actual) in self.segments.iter().zip(request_segments) {
            match pattern {
                PathSegment::Literal(literal) => {
                    if literal != actual {
                        return None;
                    }
                }
                PathSegment::Parameter(name) => {
                    captures.insert(name.clone(), actual.to_string());
                }
            }
        }

        Some(captures)
    }

    fn literal_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, PathSegment::Literal(_)))
            .count()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
}

fn parse_path(path: &str) -> Vec<PathSegment> {
    split_path(path)
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => PathSegment::Parameter(name.to_string()),
                None => PathSegment::Literal(segment.to_string()),
            }
        })
        .collect()
}

/// A resolved operation plus the raw captures from the request path.
#[derive(Debug, Clone)]
pub struct PathMatch<'a> {
    /// The matched operation.
    pub operation: &'a RegisteredOperation,
    /// Parameter name to raw path segment.
    pub captures: HashMap<String, String>,
}

/// Operation id to method, path and contract, in registration order.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: IndexMap<String, RegisteredOperation>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `operation_id` to a method, path and contract.
    ///
    /// Registering an id twice replaces the earlier binding, which is
    /// returned. The id keeps its original position.
    pub fn register(
        &mut self,
        operation_id: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        view: ViewDefinition,
    ) -> Option<RegisteredOperation> {
        let operation_id = operation_id.into();
        let operation = RegisteredOperation::new(operation_id.clone(), method, path.into(), view);

        let previous = self.operations.insert(operation_id, operation);
        if let Some(previous) = &previous {
            tracing::warn!(
                operation_id = %previous.operation_id,
                previous_path = %previous.path,
                "operation registered twice, replacing previous binding"
            );
        }
        previous
    }

    /// Returns the operation bound to `operation_id`.
    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&RegisteredOperation> {
        self.operations.get(operation_id)
    }

    /// Returns the contract bound to `operation_id`.
    ///
    /// # Errors
    ///
    /// [`MiyabiError::UnmappedOperation`] if the id was never registered.
    pub fn get_view_definition(&self, operation_id: &str) -> MiyabiResult<&ViewDefinition> {
        self.get(operation_id)
            .map(RegisteredOperation::view)
            .ok_or_else(|| MiyabiError::unmapped_operation(operation_id))
    }

    /// Iterates over operations in registration order.
    pub fn operations(&self) -> impl Iterator<Item = &RegisteredOperation> {
        self.operations.values()
    }

    /// Finds the operation serving `method` on a concrete `path`.
    ///
    /// When several templates match, the one with the most literal segments
    /// wins, then the earliest registered.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<PathMatch<'_>> {
        self.operations
            .values()
            .filter(|operation| operation.method == *method)
            .filter_map(|operation| {
                operation
                    .match_path(path)
                    .map(|captures| PathMatch {
                        operation,
                        captures,
                    })
            })
            .min_by_key(|matched| Reverse(matched.operation.literal_segments()))
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
