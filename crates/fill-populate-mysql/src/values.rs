//! Conversion between `FieldValue` and MySQL values.
//!
//! Rows are read over the binary protocol, so integers, floats and
//! temporal columns arrive typed while character, decimal and JSON columns
//! arrive as bytes.

use crate::error::MySQLPopulatorError;
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use fill_core::{FieldType, FieldValue};
use mysql_async::Value;
use std::str::FromStr;
use uuid::Uuid;

/// Convert a non-null value to a parameter for a column of `field_type`.
pub fn to_mysql(
    field: &str,
    field_type: &FieldType,
    value: &FieldValue,
) -> Result<Value, MySQLPopulatorError> {
    let mismatch = || MySQLPopulatorError::value_conversion(field, field_type, value);

    let converted = match field_type {
        FieldType::Bool => Value::Int(i64::from(value.as_bool().ok_or_else(mismatch)?)),
        FieldType::Int16 => Value::Int(
            value
                .as_i64()
                .filter(|v| i16::try_from(*v).is_ok())
                .ok_or_else(mismatch)?,
        ),
        FieldType::Int32 => Value::Int(
            value
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .ok_or_else(mismatch)?,
        ),
        FieldType::Int64 => Value::Int(value.as_i64().ok_or_else(mismatch)?),
        FieldType::Float32 => Value::Float(value.as_f64().ok_or_else(mismatch)? as f32),
        FieldType::Float64 => Value::Double(value.as_f64().ok_or_else(mismatch)?),
        FieldType::Decimal { .. } => Value::Bytes(value.decimal_string().ok_or_else(mismatch)?.into_bytes()),
        FieldType::Char { .. } | FieldType::VarChar { .. } | FieldType::Text => {
            Value::Bytes(value.to_text().into_bytes())
        }
        FieldType::Bytes => match value {
            FieldValue::Bytes(bytes) => Value::Bytes(bytes.clone()),
            FieldValue::String(s) => Value::Bytes(s.clone().into_bytes()),
            _ => return Err(mismatch()),
        },
        FieldType::Date => {
            let date = match value {
                FieldValue::String(s) => NaiveDate::from_str(s)
                    .ok()
                    .or_else(|| value.coerce_datetime().map(|dt| dt.date_naive())),
                other => other.coerce_datetime().map(|dt| dt.date_naive()),
            }
            .ok_or_else(mismatch)?;
            let year = u16::try_from(date.year()).map_err(|_| mismatch())?;
            Value::Date(year, date.month() as u8, date.day() as u8, 0, 0, 0, 0)
        }
        FieldType::DateTime | FieldType::TimestampTz => {
            datetime_value(&value.coerce_datetime().ok_or_else(mismatch)?).ok_or_else(mismatch)?
        }
        FieldType::Uuid => Value::Bytes(
            value
                .coerce_uuid()
                .ok_or_else(mismatch)?
                .to_string()
                .into_bytes(),
        ),
        FieldType::Json => Value::Bytes(value.to_json().to_string().into_bytes()),
    };
    Ok(converted)
}

/// `None` for years MySQL cannot hold.
fn datetime_value(dt: &DateTime<Utc>) -> Option<Value> {
    Some(Value::Date(
        u16::try_from(dt.year()).ok()?,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        dt.nanosecond() / 1000, // MySQL uses microseconds
    ))
}

/// Read a column value as a value of the declared type.
pub fn from_mysql(
    field: &str,
    field_type: &FieldType,
    value: Value,
) -> Result<FieldValue, MySQLPopulatorError> {
    let mismatch = |value: &Value| MySQLPopulatorError::conversion(field, field_type, format!("{value:?}"));

    let converted = match (field_type, &value) {
        (_, Value::NULL) => FieldValue::Null,
        (FieldType::Bool, Value::Int(i)) => FieldValue::Bool(*i != 0),
        (FieldType::Int16 | FieldType::Int32, Value::Int(i)) => {
            FieldValue::Int32(i32::try_from(*i).map_err(|_| mismatch(&value))?)
        }
        (FieldType::Int64, Value::Int(i)) => FieldValue::Int64(*i),
        (FieldType::Int64, Value::UInt(u)) => {
            FieldValue::Int64(i64::try_from(*u).map_err(|_| mismatch(&value))?)
        }
        (FieldType::Float32 | FieldType::Float64, Value::Float(f)) => {
            FieldValue::Float64(f64::from(*f))
        }
        (FieldType::Float32 | FieldType::Float64, Value::Double(d)) => FieldValue::Float64(*d),
        (FieldType::Decimal { precision, scale }, Value::Bytes(bytes)) => {
            FieldValue::decimal(utf8(bytes).ok_or_else(|| mismatch(&value))?, *precision, *scale)
        }
        (FieldType::Char { .. } | FieldType::VarChar { .. } | FieldType::Text, Value::Bytes(bytes)) => {
            FieldValue::String(utf8(bytes).ok_or_else(|| mismatch(&value))?)
        }
        (FieldType::Bytes, Value::Bytes(bytes)) => FieldValue::Bytes(bytes.clone()),
        (
            FieldType::Date | FieldType::DateTime | FieldType::TimestampTz,
            Value::Date(year, month, day, hour, minute, second, micros),
        ) => FieldValue::DateTime(
            NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|d| {
                    d.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map(|dt| dt.and_utc())
                .ok_or_else(|| mismatch(&value))?,
        ),
        (FieldType::Uuid, Value::Bytes(bytes)) => FieldValue::Uuid(
            utf8(bytes)
                .and_then(|s| Uuid::parse_str(&s).ok())
                .ok_or_else(|| mismatch(&value))?,
        ),
        (FieldType::Json, Value::Bytes(bytes)) => FieldValue::from_json(
            &serde_json::from_slice(bytes).map_err(|_| mismatch(&value))?,
        ),
        _ => return Err(mismatch(&value)),
    };
    Ok(converted)
}

fn utf8(bytes: &[u8]) -> Option<String> {
    String::from_utf8(bytes.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bool_and_integers() {
        assert_eq!(
            to_mysql("f", &FieldType::Bool, &FieldValue::Bool(true)).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            to_mysql("f", &FieldType::Int16, &FieldValue::Int64(12)).unwrap(),
            Value::Int(12)
        );
        assert!(to_mysql("f", &FieldType::Int16, &FieldValue::Int64(70_000)).is_err());
        assert_eq!(
            from_mysql("f", &FieldType::Bool, Value::Int(0)).unwrap(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            from_mysql("f", &FieldType::Int64, Value::UInt(9)).unwrap(),
            FieldValue::Int64(9)
        );
    }

    #[test]
    fn test_datetime_keeps_microseconds() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(123_456);
        let value = to_mysql("f", &FieldType::DateTime, &FieldValue::DateTime(dt)).unwrap();
        assert_eq!(value, Value::Date(2024, 3, 1, 12, 30, 45, 123_456));
        assert_eq!(
            from_mysql("f", &FieldType::DateTime, value).unwrap(),
            FieldValue::DateTime(dt)
        );
    }

    #[test]
    fn test_date_from_string() {
        assert_eq!(
            to_mysql("f", &FieldType::Date, &FieldValue::from("2023-12-31")).unwrap(),
            Value::Date(2023, 12, 31, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_years_before_zero_are_rejected() {
        let date = NaiveDate::from_ymd_opt(-44, 3, 15).unwrap();
        let dt = date.and_hms_opt(12, 0, 0).unwrap().and_utc();

        for field_type in [FieldType::Date, FieldType::DateTime, FieldType::TimestampTz] {
            let err = to_mysql("f", &field_type, &FieldValue::DateTime(dt)).unwrap_err();
            assert!(matches!(err, MySQLPopulatorError::Conversion { .. }));
        }
    }

    #[test]
    fn test_text_decimal_uuid_and_json() {
        let id = Uuid::new_v4();
        let stored = to_mysql("f", &FieldType::Uuid, &FieldValue::Uuid(id)).unwrap();
        assert_eq!(
            from_mysql("f", &FieldType::Uuid, stored).unwrap(),
            FieldValue::Uuid(id)
        );

        assert_eq!(
            from_mysql("f", &FieldType::decimal(6, 2), Value::Bytes(b"12.50".to_vec())).unwrap(),
            FieldValue::decimal("12.50", 6, 2)
        );
        assert_eq!(
            from_mysql("f", &FieldType::Json, Value::Bytes(br#"{"a":1}"#.to_vec()))
                .unwrap()
                .to_json(),
            serde_json::json!({"a": 1})
        );
        assert_eq!(
            to_mysql("f", &FieldType::Text, &FieldValue::from("hi")).unwrap(),
            Value::Bytes(b"hi".to_vec())
        );
    }

    #[test]
    fn test_null_and_mismatch() {
        assert_eq!(
            from_mysql("f", &FieldType::Text, Value::NULL).unwrap(),
            FieldValue::Null
        );
        assert!(from_mysql("f", &FieldType::Uuid, Value::Int(3)).is_err());
        assert!(to_mysql("f", &FieldType::Float64, &FieldValue::from("x")).is_err());
    }
}
