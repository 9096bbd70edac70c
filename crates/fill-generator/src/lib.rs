//! Value generators for the mockfill database populator.
//!
//! This crate turns generator configs from a fill plan into
//! [`ValueSpec`](fill_core::ValueSpec)s. Generators draw from the run's
//! seeded RNG, so the same seed and plan reproduce the same data. UUIDs and
//! `timestamp_now` are the exceptions: they never repeat across runs.
//!
//! # Architecture
//!
//! ```text
//! FillPlan (YAML)
//!        │
//!        ▼
//! GeneratorConfig ──spec_from_config──▶ ValueSpec ──resolve(ctx)──▶ FieldValue
//!                                         ▲
//!                    provider::* ─────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use fill_core::{FieldValue, ModelId, ValueContext};
//! use fill_generator::provider;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let spec = provider::pattern("user_{index}@example.com");
//! let mut rng = StdRng::seed_from_u64(42);
//! let model = ModelId::from("users");
//! let value = spec.resolve(&mut ValueContext::new(&mut rng, &model, 3)).unwrap();
//! assert_eq!(value, FieldValue::from("user_3@example.com"));
//! ```
//!
//! # Generators
//!
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `decimal_range` - Random decimals in a range
//! - `timestamp_range` - Random timestamps in a date range
//! - `timestamp_now` - Current time
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Static value
//! - `null` - Null value
//! - `faker` - Realistic names, emails, URLs, file names, addresses, text and
//!   hex digests, in the plan's locale

pub mod config;
pub mod generators;
pub mod provider;

// Re-exports for convenience
pub use config::{config_name, model_specs, spec_from_config, GeneratorError};
