//! Conversion between `FieldValue` and PostgreSQL column values.
//!
//! Values are bound according to the declared `FieldType` of the column, so
//! a generator producing an `Int64` can still fill a `SMALLINT` column as
//! long as the value fits.

use crate::error::PostgreSQLPopulatorError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fill_core::{FieldType, FieldValue};
use rust_decimal::Decimal;
use std::str::FromStr;
use postgres_types::ToSql;
use tokio_postgres::Row;
use uuid::Uuid;

/// Boxed query parameter.
pub type SqlParam = Box<dyn ToSql + Sync + Send>;

/// Convert a non-null value to a parameter for a column of `field_type`.
pub fn to_sql_param(
    field: &str,
    field_type: &FieldType,
    value: &FieldValue,
) -> Result<SqlParam, PostgreSQLPopulatorError> {
    let mismatch = || PostgreSQLPopulatorError::conversion(field, field_type, value);

    let param: SqlParam = match field_type {
        FieldType::Bool => Box::new(value.as_bool().ok_or_else(mismatch)?),
        FieldType::Int16 => Box::new(
            value
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .ok_or_else(mismatch)?,
        ),
        FieldType::Int32 => Box::new(
            value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(mismatch)?,
        ),
        FieldType::Int64 => Box::new(value.as_i64().ok_or_else(mismatch)?),
        FieldType::Float32 => Box::new(value.as_f64().ok_or_else(mismatch)? as f32),
        FieldType::Float64 => Box::new(value.as_f64().ok_or_else(mismatch)?),
        FieldType::Decimal { .. } => Box::new(
            value
                .decimal_string()
                .and_then(|s| Decimal::from_str(&s).ok())
                .ok_or_else(mismatch)?,
        ),
        FieldType::Char { .. } | FieldType::VarChar { .. } | FieldType::Text => {
            Box::new(value.to_text())
        }
        FieldType::Bytes => match value {
            FieldValue::Bytes(bytes) => Box::new(bytes.clone()),
            FieldValue::String(s) => Box::new(s.clone().into_bytes()),
            _ => return Err(mismatch()),
        },
        FieldType::Date => Box::new(to_date(value).ok_or_else(mismatch)?),
        FieldType::DateTime => Box::new(value.coerce_datetime().ok_or_else(mismatch)?.naive_utc()),
        FieldType::TimestampTz => Box::new(value.coerce_datetime().ok_or_else(mismatch)?),
        FieldType::Uuid => Box::new(value.coerce_uuid().ok_or_else(mismatch)?),
        FieldType::Json => Box::new(value.to_json()),
    };
    Ok(param)
}

fn to_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::String(s) => NaiveDate::from_str(s)
            .ok()
            .or_else(|| value.coerce_datetime().map(|dt| dt.date_naive())),
        other => other.coerce_datetime().map(|dt| dt.date_naive()),
    }
}

/// Read column `name` of `row` as a value of the declared type.
pub fn from_row(
    row: &Row,
    name: &str,
    field_type: &FieldType,
) -> Result<FieldValue, PostgreSQLPopulatorError> {
    let value = match field_type {
        FieldType::Bool => row.try_get::<_, Option<bool>>(name)?.map(FieldValue::Bool),
        FieldType::Int16 => row
            .try_get::<_, Option<i16>>(name)?
            .map(|v| FieldValue::Int32(i32::from(v))),
        FieldType::Int32 => row.try_get::<_, Option<i32>>(name)?.map(FieldValue::Int32),
        FieldType::Int64 => row.try_get::<_, Option<i64>>(name)?.map(FieldValue::Int64),
        FieldType::Float32 => row
            .try_get::<_, Option<f32>>(name)?
            .map(|v| FieldValue::Float64(f64::from(v))),
        FieldType::Float64 => row.try_get::<_, Option<f64>>(name)?.map(FieldValue::Float64),
        FieldType::Decimal { precision, scale } => row
            .try_get::<_, Option<Decimal>>(name)?
            .map(|d| FieldValue::decimal(d.to_string(), *precision, *scale)),
        FieldType::Char { .. } | FieldType::VarChar { .. } | FieldType::Text => {
            row.try_get::<_, Option<String>>(name)?.map(FieldValue::String)
        }
        FieldType::Bytes => row.try_get::<_, Option<Vec<u8>>>(name)?.map(FieldValue::Bytes),
        FieldType::Date => match row.try_get::<_, Option<NaiveDate>>(name)? {
            Some(date) => Some(FieldValue::DateTime(
                date.and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc())
                    .ok_or_else(|| {
                        PostgreSQLPopulatorError::conversion(
                            name,
                            field_type,
                            &FieldValue::String(date.to_string()),
                        )
                    })?,
            )),
            None => None,
        },
        FieldType::DateTime => row
            .try_get::<_, Option<NaiveDateTime>>(name)?
            .map(|ts| FieldValue::DateTime(ts.and_utc())),
        FieldType::TimestampTz => row
            .try_get::<_, Option<DateTime<Utc>>>(name)?
            .map(FieldValue::DateTime),
        FieldType::Uuid => row.try_get::<_, Option<Uuid>>(name)?.map(FieldValue::Uuid),
        FieldType::Json => row
            .try_get::<_, Option<serde_json::Value>>(name)?
            .map(|json| FieldValue::from_json(&json)),
    };
    Ok(value.unwrap_or(FieldValue::Null))
}
