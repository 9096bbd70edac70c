//! Error types for registration, assignment and generation.

use crate::introspect::BackendKind;
use fill_core::{ModelId, ValueError};
use thiserror::Error;

/// Errors raised by a backend adapter.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Field name not declared on the model.
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: ModelId, field: String },

    /// Field exists but does not reference another model.
    #[error("Field '{field}' of model '{model}' is not a reference field")]
    NotAReference { model: ModelId, field: String },

    /// Value rejected by the storage (NOT NULL, foreign key, duplicate key, type).
    #[error("Constraint violation on model '{model}': {message}")]
    Constraint { model: ModelId, message: String },

    /// Driver or connection failure.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wrap a driver error.
    pub fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(error))
    }

    pub fn constraint(model: &ModelId, message: impl Into<String>) -> Self {
        Self::Constraint {
            model: model.clone(),
            message: message.into(),
        }
    }
}

/// Errors raised while registering models, assigning value specifications
/// or generating instances.
///
/// Every error aborts the current `generate()` call. Rows persisted before
/// the failure stay in place.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Counts do not line up with the registered models.
    #[error("Expected {expected} counts (one per registered model), got {actual}")]
    ArgumentCountMismatch { expected: usize, actual: usize },

    /// Assignment to a field the model does not declare.
    #[error("Model '{model}' has no field '{field}'")]
    UnknownField { model: ModelId, field: String },

    /// Lookup of a model that was never registered.
    #[error("Model '{0}' is not registered")]
    UnknownModel(String),

    /// Reference fields are always resolved from existing rows.
    #[error("Field '{field}' of model '{model}' is a reference and cannot be assigned")]
    ReferenceFieldAssignment { model: ModelId, field: String },

    /// Registered models span more than one backend.
    #[error("Model '{model}' uses backend {found}, but the registry uses {expected}")]
    InconsistentBackend {
        model: ModelId,
        expected: BackendKind,
        found: BackendKind,
    },

    /// The same model was registered twice.
    #[error("Model '{0}' is registered more than once")]
    DuplicateModel(ModelId),

    /// A reference field points at a model outside the registry.
    #[error("Field '{field}' of model '{model}' references unregistered model '{target}'")]
    UnregisteredReference {
        model: ModelId,
        field: String,
        target: ModelId,
    },

    /// No model could make progress in a full pass over the queue.
    #[error("Cyclic dependency between models: {}", join_models(.models))]
    CyclicDependency { models: Vec<ModelId> },

    /// A reference field needs a row from a model that has none.
    #[error(
        "Field '{field}' of model '{model}' references '{target}', which has no persisted rows"
    )]
    EmptyReferenceTarget {
        model: ModelId,
        field: String,
        target: ModelId,
    },

    /// Invalid caller input (e.g. a negative count).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value specification failed to resolve.
    #[error("Failed to generate '{model}.{field}': {source}")]
    Value {
        model: ModelId,
        field: String,
        #[source]
        source: ValueError,
    },

    /// Persistence failure from the backend adapter.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

fn join_models(models: &[ModelId]) -> String {
    models
        .iter()
        .map(ModelId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_names_models() {
        let err = PopulateError::CyclicDependency {
            models: vec![ModelId::from("a"), ModelId::from("b")],
        };
        assert_eq!(err.to_string(), "Cyclic dependency between models: a, b");
    }

    #[test]
    fn test_backend_error_is_transparent() {
        let err: PopulateError = BackendError::constraint(&ModelId::from("posts"), "null id").into();
        assert_eq!(
            err.to_string(),
            "Constraint violation on model 'posts': null id"
        );
    }
}
