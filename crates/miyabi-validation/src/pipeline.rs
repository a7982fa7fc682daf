//! Request validation pipeline.
//!
//! One request moves through a strictly ordered set of states:
//!
//! ```text
//! Unvalidated → PathValidated → BodyValidated → Combined → Ready
//! ```
//!
//! `PathValidated` and `BodyValidated` are entered only when the request
//! definition declares the matching partial schema. Any failing step aborts
//! the run; a pipeline never moves backwards and runs at most once.

use std::collections::HashMap;
use std::fmt;

use miyabi_core::{combine_schemas, MiyabiError, MiyabiResult, RecordInstance, RequestDefinition};

use crate::config::ValidationConfig;
use crate::extract::{validate_body_schema, validate_path_schema};

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineState {
    /// Nothing validated yet.
    Unvalidated,
    /// Path captures validated.
    PathValidated,
    /// Body validated.
    BodyValidated,
    /// Partial instances combined into the canonical instance.
    Combined,
    /// The canonical instance is available.
    Ready,
}

impl PipelineState {
    /// Returns the state name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unvalidated => "unvalidated",
            Self::PathValidated => "path_validated",
            Self::BodyValidated => "body_validated",
            Self::Combined => "combined",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates one request against its [`RequestDefinition`].
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use miyabi_core::fixtures;
/// use miyabi_validation::{PipelineState, RequestPipeline, ValidationConfig};
/// use serde_json::json;
///
/// let view = fixtures::update_user_view();
/// let config = ValidationConfig::default();
/// let captures = HashMap::from([("id".to_string(), "5".to_string())]);
///
/// let mut pipeline = RequestPipeline::new("updateUser", view.request(), &config);
/// let instance = pipeline
///     .run(&captures, &json!({"name": "ann", "email": "ann@example.com"}))
///     .unwrap();
///
/// assert_eq!(pipeline.state(), PipelineState::Ready);
/// assert_eq!(instance.name(), "UpdateUserRequest");
/// ```
#[derive(Debug)]
pub struct RequestPipeline<'a> {
    operation_id: &'a str,
    definition: &'a RequestDefinition,
    reject_missing_fields: bool,
    state: PipelineState,
    partials: Vec<RecordInstance>,
}

impl<'a> RequestPipeline<'a> {
    /// Creates a pipeline in the `Unvalidated` state.
    #[must_use]
    pub fn new(
        operation_id: &'a str,
        definition: &'a RequestDefinition,
        config: &ValidationConfig,
    ) -> Self {
        Self {
            operation_id,
            definition,
            reject_missing_fields: config.reject_missing_fields,
            state: PipelineState::Unvalidated,
            partials: Vec::with_capacity(2),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs every step and returns the canonical request instance.
    ///
    /// # Errors
    ///
    /// The first failing step's error: [`MiyabiError::Validation`] from an
    /// extractor, [`MiyabiError::MissingField`] from the combiner, or
    /// [`MiyabiError::Definition`] if this pipeline already ran.
    pub fn run(
        &mut self,
        path_captures: &HashMap<String, String>,
        body: &serde_json::Value,
    ) -> MiyabiResult<RecordInstance> {
        if self.state != PipelineState::Unvalidated {
            return Err(MiyabiError::definition(format!(
                "request pipeline for '{}' already ran",
                self.operation_id
            )));
        }

        if let Some(instance) = validate_path_schema(
            self.definition.path_schema(),
            path_captures,
            self.reject_missing_fields,
        )? {
            self.partials.push(instance);
            self.advance(PipelineState::PathValidated);
        }

        if let Some(instance) =
            validate_body_schema(self.definition.body_schema(), body, self.reject_missing_fields)?
        {
            self.partials.push(instance);
            self.advance(PipelineState::BodyValidated);
        }

        let combined = combine_schemas(self.definition.schema(), &self.partials)?;
        self.advance(PipelineState::Combined);
        self.advance(PipelineState::Ready);

        Ok(combined)
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!(
            operation_id = %self.operation_id,
            from = %self.state,
            to = %next,
            "request pipeline transition"
        );
        self.state = next;
    }
}
