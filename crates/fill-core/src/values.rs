//! Value representations for mockfill.
//!
//! This module defines the values produced by value generators and the
//! persisted instances returned by backend adapters.

use crate::model::ModelId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Field values of one instance, keyed by field name.
pub type FieldValues = HashMap<String, FieldValue>;

/// A single field value.
///
/// `FieldValue` is backend-neutral; adapters coerce it to their native
/// representation using the declared `FieldType` of the target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),

    /// Decimal value stored as string with precision info
    Decimal {
        /// String representation of the decimal value
        value: String,
        /// Total number of digits
        precision: u8,
        /// Number of digits after decimal point
        scale: u8,
    },

    /// Array of values
    Array(Vec<FieldValue>),

    /// Object/map of values
    Object(HashMap<String, FieldValue>),

    /// Null value
    Null,
}

impl FieldValue {
    /// Create a new decimal value.
    pub fn decimal(value: impl Into<String>, precision: u8, scale: u8) -> Self {
        Self::Decimal {
            value: value.into(),
            precision,
            scale,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64 (widening 32-bit integers).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Try to get this value as an f64 (integers are converted).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Int32(i) => Some(f64::from(*i)),
            Self::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Try to get this value as a DateTime.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Convert to a JSON value (used for JSON columns).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int32(i) => serde_json::Value::from(*i),
            Self::Int64(i) => serde_json::Value::from(*i),
            Self::Float64(f) => serde_json::Value::from(*f),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Bytes(b) => serde_json::Value::Array(b.iter().map(|x| (*x).into()).collect()),
            Self::Uuid(u) => serde_json::Value::String(u.to_string()),
            Self::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Self::Decimal { value, .. } => serde_json::Value::String(value.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            Self::Object(obj) => serde_json::Value::Object(
                obj.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Self::Null => serde_json::Value::Null,
        }
    }

    /// Convert a JSON value into a field value.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int64(i),
                None => Self::Float64(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => {
                Self::Array(items.iter().map(FieldValue::from_json).collect())
            }
            serde_json::Value::Object(obj) => Self::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Text form used when binding to a character column.
    ///
    /// Strings are returned unquoted; everything else uses `Display`.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Timestamp value, parsing RFC 3339 strings.
    pub fn coerce_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// UUID value, parsing hyphenated strings.
    pub fn coerce_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::String(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    /// Decimal digits of a numeric value.
    pub fn decimal_string(&self) -> Option<String> {
        match self {
            Self::Decimal { value, .. } => Some(value.clone()),
            Self::Int32(i) => Some(i.to_string()),
            Self::Int64(i) => Some(i.to_string()),
            Self::Float64(f) if f.is_finite() => Some(f.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Decimal { value, .. } => f.write_str(value),
            Self::Array(_) | Self::Object(_) => write!(f, "{}", self.to_json()),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

/// A persisted row of a model.
///
/// `id` is the row identity (primary key value); it is what reference fields
/// of other models store when they point at this instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Model this instance belongs to
    pub model: ModelId,

    /// Primary key value
    pub id: FieldValue,

    /// Field values (field name -> value), primary key excluded
    pub fields: FieldValues,
}

impl Instance {
    /// Create a new instance.
    pub fn new(model: impl Into<ModelId>, id: FieldValue, fields: FieldValues) -> Self {
        Self {
            model: model.into(),
            id,
            fields,
        }
    }

    /// Create a new instance with a builder pattern.
    pub fn builder(model: impl Into<ModelId>, id: FieldValue) -> InstanceBuilder {
        InstanceBuilder {
            model: model.into(),
            id,
            fields: HashMap::new(),
        }
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get the number of fields (excluding the id).
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Builder for `Instance`.
pub struct InstanceBuilder {
    model: ModelId,
    id: FieldValue,
    fields: FieldValues,
}

impl InstanceBuilder {
    /// Add a field to the instance.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Build the instance.
    pub fn build(self) -> Instance {
        Instance {
            model: self.model,
            id: self.id,
            fields: self.fields,
        }
    }
}
