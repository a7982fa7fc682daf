//! Startup builder.

use std::path::PathBuf;
use std::sync::Arc;

use http::Method;
use miyabi_config::MiyabiConfig;
use miyabi_core::{MiyabiError, MiyabiResult, OperationRegistry, ViewDefinition};
use miyabi_docs::BasicInfo;
use miyabi_validation::{ContractValidator, ValidationConfig};

use crate::app::MiyabiApp;
use crate::config::{basic_info, validation_config};

/// Collects operations at startup and freezes them into a [`MiyabiApp`].
///
/// # Example
///
/// ```
/// use http::Method;
/// use miyabi::Miyabi;
/// use miyabi_core::fixtures;
///
/// let mut miyabi = Miyabi::new();
/// miyabi
///     .add_route("getUser", Method::GET, "/users/{id}", fixtures::get_user_view())
///     .unwrap();
///
/// let app = miyabi.build();
/// assert_eq!(app.registry().len(), 1);
/// ```
#[derive(Debug)]
pub struct Miyabi {
    registry: OperationRegistry,
    validation: ValidationConfig,
    basic: BasicInfo,
    swagger_path: PathBuf,
}

impl Default for Miyabi {
    fn default() -> Self {
        Self::new()
    }
}

impl Miyabi {
    /// Creates a builder with default validation and docs settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&MiyabiConfig::default())
    }

    /// Creates a builder from loaded configuration.
    #[must_use]
    pub fn from_config(config: &MiyabiConfig) -> Self {
        Self {
            registry: OperationRegistry::new(),
            validation: validation_config(&config.validation),
            basic: basic_info(&config.docs),
            swagger_path: PathBuf::from(&config.docs.output_path),
        }
    }

    /// Replaces the validation settings.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Replaces the Swagger metadata.
    #[must_use]
    pub fn with_basic_info(mut self, basic: BasicInfo) -> Self {
        self.basic = basic;
        self
    }

    /// Registers an operation after checking its request definition.
    ///
    /// # Errors
    ///
    /// [`MiyabiError::Definition`] if the partial schemas overlap, do not
    /// cover the canonical schema, disagree with it on a field type, or if
    /// the path schema declares a field with no matching `{name}` segment in
    /// `path`, or if `method` and `path` are already bound to another
    /// operation. Nothing is registered on error.
    pub fn add_route(
        &mut self,
        operation_id: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        view: ViewDefinition,
    ) -> MiyabiResult<&mut Self> {
        let operation_id = operation_id.into();
        let path = path.into();

        view.request().check().map_err(|error| match error {
            MiyabiError::Definition { message } => {
                MiyabiError::definition(format!("operation '{operation_id}': {message}"))
            }
            other => other,
        })?;
        check_path_parameters(&operation_id, &path, &view)?;
        self.check_route_free(&operation_id, &method, &path)?;

        tracing::debug!(
            operation_id = %operation_id,
            method = %method,
            path = %path,
            "route registered"
        );
        self.registry.register(operation_id, method, path, view);
        Ok(self)
    }

    fn check_route_free(&self, operation_id: &str, method: &Method, path: &str) -> MiyabiResult<()> {
        let taken = self.registry.operations().find(|existing| {
            existing.method() == method
                && existing.path() == path
                && existing.operation_id() != operation_id
        });

        match taken {
            Some(existing) => Err(MiyabiError::definition(format!(
                "operation '{operation_id}': {method} {path} is already bound to '{}'",
                existing.operation_id()
            ))),
            None => Ok(()),
        }
    }

    /// Returns the operations registered so far.
    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Freezes the registry. No operation can be added afterwards.
    #[must_use]
    pub fn build(self) -> MiyabiApp {
        let registry = Arc::new(self.registry);
        tracing::info!(operations = registry.len(), "operation registry frozen");

        MiyabiApp::new(
            ContractValidator::new(registry, self.validation),
            self.basic,
            self.swagger_path,
        )
    }
}

fn check_path_parameters(operation_id: &str, path: &str, view: &ViewDefinition) -> MiyabiResult<()> {
    let Some(path_schema) = view.request().path_schema() else {
        return Ok(());
    };

    for name in path_schema.field_names() {
        let segment = format!("{{{name}}}");
        if !path.split('/').any(|part| part == segment) {
            return Err(MiyabiError::definition(format!(
                "operation '{operation_id}': path schema field '{name}' has no '{segment}' segment in '{path}'"
            )));
        }
    }
    Ok(())
}
