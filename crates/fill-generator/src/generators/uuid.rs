//! UUID value generator.
//!
//! UUIDs are drawn from the operating system's randomness, not from the
//! run's seeded RNG: they usually end up as keys, and a re-run with the same
//! seed must not collide with the rows it already wrote.

use fill_core::FieldValue;
use uuid::Uuid;

/// Generate a random UUID v4.
pub fn generate_uuid_v4() -> FieldValue {
    FieldValue::Uuid(Uuid::new_v4())
}
