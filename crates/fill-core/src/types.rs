//! Column types for mockfill model definitions.
//!
//! This module defines `FieldType`, the backend-neutral type of a model field.
//! Each backend crate maps `FieldType` to its native column type when it
//! creates storage, and uses it to coerce generated values before insertion.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Backend-neutral type of a model field.
///
/// # YAML Format
///
/// Simple types can be specified as strings:
/// ```yaml
/// type: uuid
/// type: int
/// type: text
/// ```
///
/// Parameterised types use object format:
/// ```yaml
/// type:
///   type: var_char
///   length: 255
/// type:
///   type: decimal
///   precision: 10
///   scale: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Boolean value
    Bool,

    /// 16-bit signed integer
    Int16,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 32-bit IEEE 754 floating point
    Float32,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Exact decimal with specified precision and scale
    Decimal {
        /// Total number of digits
        precision: u8,
        /// Number of digits after the decimal point
        scale: u8,
    },

    /// Fixed-length character string
    Char {
        /// Maximum length
        length: u16,
    },

    /// Variable-length character string with max length
    VarChar {
        /// Maximum length
        length: u16,
    },

    /// Unlimited text
    Text,

    /// Binary data
    Bytes,

    /// Date only (YYYY-MM-DD)
    Date,

    /// Timestamp without timezone
    DateTime,

    /// Timestamp with timezone
    TimestampTz,

    /// UUID (128-bit)
    Uuid,

    /// JSON document
    Json,
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Decimal { precision, scale } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "decimal")?;
                map.serialize_entry("precision", precision)?;
                map.serialize_entry("scale", scale)?;
                map.end()
            }
            Self::Char { length } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "char")?;
                map.serialize_entry("length", length)?;
                map.end()
            }
            Self::VarChar { length } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "var_char")?;
                map.serialize_entry("length", length)?;
                map.end()
            }
            simple => serializer.serialize_str(simple.simple_name().unwrap_or("text")),
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldTypeVisitor;

        impl<'de> Visitor<'de> for FieldTypeVisitor {
            type Value = FieldType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a field type")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                FieldType::from_simple_name(value)
                    .ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "decimal" => {
                        let precision = get_field_required(&fields, "precision")?;
                        let scale = get_field_required(&fields, "scale")?;
                        Ok(FieldType::Decimal { precision, scale })
                    }
                    "char" => {
                        let length = get_field_required(&fields, "length")?;
                        Ok(FieldType::Char { length })
                    }
                    "var_char" | "varchar" => {
                        let length = get_field_required(&fields, "length")?;
                        Ok(FieldType::VarChar { length })
                    }
                    other => FieldType::from_simple_name(other)
                        .ok_or_else(|| M::Error::custom(format!("unknown type: {other}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldTypeVisitor)
    }
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

impl FieldType {
    /// Create a new Decimal type with the given precision and scale.
    pub fn decimal(precision: u8, scale: u8) -> Self {
        Self::Decimal { precision, scale }
    }

    /// Create a new Char type with the given length.
    pub fn char(length: u16) -> Self {
        Self::Char { length }
    }

    /// Create a new VarChar type with the given length.
    pub fn varchar(length: u16) -> Self {
        Self::VarChar { length }
    }

    fn from_simple_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" => Self::Bool,
            "small_int" | "smallint" => Self::Int16,
            "int" => Self::Int32,
            "big_int" | "bigint" => Self::Int64,
            "float" => Self::Float32,
            "double" => Self::Float64,
            "text" => Self::Text,
            "bytes" | "blob" => Self::Bytes,
            "date" => Self::Date,
            "date_time" | "datetime" => Self::DateTime,
            "timestamp_tz" | "timestamptz" => Self::TimestampTz,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            _ => return None,
        };
        Some(ty)
    }

    fn simple_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Bool => "bool",
            Self::Int16 => "small_int",
            Self::Int32 => "int",
            Self::Int64 => "big_int",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::TimestampTz => "timestamp_tz",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Decimal { .. } | Self::Char { .. } | Self::VarChar { .. } => return None,
        };
        Some(name)
    }

    /// Check if this type is an integer type (usable as an auto-increment key).
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Check if this type represents a numeric type.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Float32 | Self::Float64 | Self::Decimal { .. })
    }

    /// Check if this type represents a string type.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Char { .. } | Self::VarChar { .. } | Self::Text)
    }

    /// Check if this type represents a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::TimestampTz)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Char { length } => write!(f, "char({length})"),
            Self::VarChar { length } => write!(f, "var_char({length})"),
            simple => f.write_str(simple.simple_name().unwrap_or("text")),
        }
    }
}
