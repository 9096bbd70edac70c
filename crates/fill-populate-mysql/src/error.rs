//! Error types for the MySQL adapter.

use fill_core::{FieldType, FieldValue, ModelId};
use fill_populate::BackendError;
use thiserror::Error;

/// Errors that can occur in the MySQL adapter.
#[derive(Error, Debug)]
pub enum MySQLPopulatorError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// A value cannot be bound to, or read from, a column of the declared type.
    #[error("Cannot convert {value} for column '{field}' of type {field_type}")]
    Conversion {
        field: String,
        field_type: FieldType,
        value: String,
    },

    /// The database did not report the key of an inserted row.
    #[error("No key reported for the row inserted into '{0}'")]
    MissingKey(String),
}

impl MySQLPopulatorError {
    pub(crate) fn conversion(field: &str, field_type: &FieldType, value: impl ToString) -> Self {
        Self::Conversion {
            field: field.to_string(),
            field_type: field_type.clone(),
            value: value.to_string(),
        }
    }

    pub(crate) fn value_conversion(field: &str, field_type: &FieldType, value: &FieldValue) -> Self {
        Self::conversion(field, field_type, value)
    }

    /// Map onto the engine's error type.
    ///
    /// Server errors with SQLSTATE class 23 (NOT NULL, duplicate key, foreign
    /// key) and conversion failures are constraint errors.
    pub fn into_backend(self, model: &ModelId) -> BackendError {
        match self {
            Self::MySQL(mysql_async::Error::Server(ref server)) if server.state.starts_with("23") => {
                BackendError::constraint(model, server.message.clone())
            }
            Self::Conversion { .. } => BackendError::constraint(model, self.to_string()),
            other => BackendError::storage(other),
        }
    }
}
