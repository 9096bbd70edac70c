//! Error types for the PostgreSQL adapter.

use fill_core::{FieldType, FieldValue, ModelId};
use fill_populate::BackendError;
use thiserror::Error;

/// Errors that can occur in the PostgreSQL adapter.
#[derive(Error, Debug)]
pub enum PostgreSQLPopulatorError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A value cannot be bound to, or read from, a column of the declared type.
    #[error("Cannot convert {value} for column '{field}' of type {field_type}")]
    Conversion {
        field: String,
        field_type: FieldType,
        value: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl PostgreSQLPopulatorError {
    pub(crate) fn conversion(field: &str, field_type: &FieldType, value: &FieldValue) -> Self {
        Self::Conversion {
            field: field.to_string(),
            field_type: field_type.clone(),
            value: value.to_string(),
        }
    }

    /// Map onto the engine's error type.
    ///
    /// Integrity violations (SQLSTATE class 23) and conversion failures are
    /// reported as constraint errors; anything else is a storage failure.
    pub fn into_backend(self, model: &ModelId) -> BackendError {
        if let Self::PostgreSQL(err) = &self {
            if let Some(db) = err.as_db_error() {
                if db.code().code().starts_with("23") {
                    return BackendError::constraint(model, db.message());
                }
            }
        }
        match self {
            Self::Conversion { .. } => BackendError::constraint(model, self.to_string()),
            other => BackendError::storage(other),
        }
    }
}
