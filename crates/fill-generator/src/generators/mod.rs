//! Individual value generators for different data types.
//!
//! Most functions draw from the caller's seeded RNG so runs with the same
//! seed reproduce the same values. UUIDs (including the `{uuid}` pattern
//! placeholder) and `timestamp_now` do not. `provider` binds these functions
//! into `ValueSpec`s.

pub mod faker;
pub mod numeric;
pub mod pattern;
pub mod static_value;
pub mod timestamp;
pub mod uuid;

use fill_core::ValueError;

/// Reject ranges whose lower bound exceeds the upper bound.
pub(crate) fn check_range<T: PartialOrd + std::fmt::Display>(
    min: T,
    max: T,
) -> Result<(), ValueError> {
    if min > max {
        return Err(ValueError::InvalidArgument {
            name: "min".to_string(),
            reason: format!("min ({min}) must not exceed max ({max})"),
        });
    }
    Ok(())
}
