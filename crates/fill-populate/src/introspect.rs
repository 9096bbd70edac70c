//! The model introspection contract each backend adapter implements.

use crate::error::BackendError;
use async_trait::async_trait;
use fill_core::{FieldValues, Instance, ModelDefinition, ModelId};
use std::fmt;

/// Persistence backend a model lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    Memory,
    PostgreSQL,
    MySQL,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::PostgreSQL => "postgresql",
            Self::MySQL => "mysql",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the engine needs to know about, and do with, one model.
///
/// Field names include the primary key. Reference fields hold the primary
/// key value of a row in the referenced model.
#[async_trait]
pub trait ModelIntrospector: Send + Sync {
    /// Identity of the model.
    fn model(&self) -> &ModelId;

    /// Backend the model lives in.
    fn backend(&self) -> BackendKind;

    /// Ordered field names, primary key first.
    fn fields(&self) -> Vec<String>;

    /// Whether `name` references another model.
    ///
    /// Fails with `BackendError::UnknownField` for undeclared names.
    fn is_reference_field(&self, name: &str) -> Result<bool, BackendError>;

    /// Model referenced by the reference field `name`.
    fn referenced_model(&self, name: &str) -> Result<ModelId, BackendError>;

    /// Create the model's storage if it does not exist yet.
    async fn ensure_storage_exists(&self) -> Result<(), BackendError>;

    /// Persist one row built from `values` and return it as stored.
    ///
    /// Null values are left to the storage default.
    async fn create_and_persist(&self, values: FieldValues) -> Result<Instance, BackendError>;

    /// A uniformly random persisted row, or `None` when there are none.
    async fn random_existing(&self) -> Result<Option<Instance>, BackendError>;

    /// Number of persisted rows.
    async fn count_existing(&self) -> Result<u64, BackendError>;
}

/// Introspection answers derived from a declared `ModelDefinition`.
///
/// Backend adapters that are built from a definition delegate the
/// synchronous half of `ModelIntrospector` to these functions.
pub mod definition {
    use super::*;

    pub fn fields(definition: &ModelDefinition) -> Vec<String> {
        definition
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_reference_field(
        definition: &ModelDefinition,
        name: &str,
    ) -> Result<bool, BackendError> {
        if definition.primary_key.name == name {
            return Ok(false);
        }
        definition
            .get_field(name)
            .map(|f| f.is_reference())
            .ok_or_else(|| unknown_field(definition, name))
    }

    pub fn referenced_model(
        definition: &ModelDefinition,
        name: &str,
    ) -> Result<ModelId, BackendError> {
        if !definition.has_field(name) {
            return Err(unknown_field(definition, name));
        }
        definition
            .get_field(name)
            .and_then(|f| f.references.clone())
            .ok_or_else(|| BackendError::NotAReference {
                model: definition.name.clone(),
                field: name.to_string(),
            })
    }

    /// Reject values for fields the definition does not declare.
    pub fn check_known_fields(
        definition: &ModelDefinition,
        values: &FieldValues,
    ) -> Result<(), BackendError> {
        match values.keys().find(|name| !definition.has_field(name)) {
            Some(name) => Err(unknown_field(definition, name)),
            None => Ok(()),
        }
    }

    fn unknown_field(definition: &ModelDefinition, name: &str) -> BackendError {
        BackendError::UnknownField {
            model: definition.name.clone(),
            field: name.to_string(),
        }
    }
}
