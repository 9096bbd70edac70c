//! Numeric value generators.

use super::check_range;
use fill_core::{FieldValue, ValueError};
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(
    rng: &mut R,
    min: i64,
    max: i64,
) -> Result<FieldValue, ValueError> {
    check_range(min, max)?;
    Ok(FieldValue::Int64(rng.gen_range(min..=max)))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(
    rng: &mut R,
    min: f64,
    max: f64,
) -> Result<FieldValue, ValueError> {
    check_finite(min, max)?;
    check_range(min, max)?;
    Ok(FieldValue::Float64(rng.gen_range(min..=max)))
}

/// Generate a random decimal in the given range.
///
/// The decimal is stored as a string with 2 decimal places.
pub fn generate_decimal_range<R: Rng>(
    rng: &mut R,
    min: f64,
    max: f64,
) -> Result<FieldValue, ValueError> {
    check_finite(min, max)?;
    check_range(min, max)?;
    let value = rng.gen_range(min..=max);
    Ok(FieldValue::decimal(format!("{value:.2}"), 10, 2))
}

/// Generate a boolean that is true with probability `true_weight`.
pub fn generate_weighted_bool<R: Rng>(
    rng: &mut R,
    true_weight: f64,
) -> Result<FieldValue, ValueError> {
    if !(0.0..=1.0).contains(&true_weight) {
        return Err(ValueError::InvalidArgument {
            name: "true_weight".to_string(),
            reason: format!("must be between 0.0 and 1.0, got {true_weight}"),
        });
    }
    Ok(FieldValue::Bool(rng.gen_bool(true_weight)))
}

/// Generate `start + index`.
pub fn generate_sequential(start: i64, index: u64) -> Result<FieldValue, ValueError> {
    i64::try_from(index)
        .ok()
        .and_then(|index| start.checked_add(index))
        .map(FieldValue::Int64)
        .ok_or_else(|| ValueError::Generator(format!("sequence overflow at {start} + {index}")))
}

fn check_finite(min: f64, max: f64) -> Result<(), ValueError> {
    if min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(ValueError::InvalidArgument {
            name: "min".to_string(),
            reason: format!("bounds must be finite, got {min}..={max}"),
        })
    }
}
