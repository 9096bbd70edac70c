//! Populate integration tests.
//!
//! Every test runs the full register -> assign -> generate workflow against
//! the in-memory backend, which enforces NOT NULL and foreign keys the way a
//! database would:
//! 1. Register model adapters (storage is created in dependency order)
//! 2. Assign value specifications to value fields
//! 3. Generate, then inspect the persisted rows

mod common;
mod cycle_test;
mod errors_test;
mod plan_test;
mod reference_test;
mod self_reference_test;
