//! Core types for the mockfill database populator.
//!
//! This crate provides the foundational types used across mockfill,
//! including:
//!
//! - [`FieldType`] - Backend-neutral column types
//! - [`FieldValue`] - Values produced by generators and stored by adapters
//! - [`Instance`] - A persisted row handed back by a backend adapter
//! - [`ModelDefinition`] - Declared model schema (no generators)
//! - [`FillPlan`] - Fill plans loaded from YAML
//! - [`ValueSpec`] - Deferred, parameterised value generators
//!
//! # Architecture
//!
//! ```text
//! fill-core (this crate)
//!    │
//!    ├─── fill-generator            (builds ValueSpecs from generator configs)
//!    │
//!    └─── fill-populate             (dependency scheduler and instance generator)
//!            ├─── fill-populate-postgresql
//!            └─── fill-populate-mysql
//! ```
//!
//! # Example
//!
//! ```rust
//! use fill_core::{FieldValue, ModelId, ValueContext, ValueSpec};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let spec = ValueSpec::new("greeting", |ctx, _| {
//!     Ok(FieldValue::String(format!("hello #{}", ctx.index)))
//! });
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let model = ModelId::from("users");
//! let value = spec.resolve(&mut ValueContext::new(&mut rng, &model, 3)).unwrap();
//! assert_eq!(value, FieldValue::from("hello #3"));
//! ```

pub mod model;
pub mod spec;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use model::{
    FakerKind, FieldDefinition, FillPlan, GeneratorConfig, Locale, ModelDefinition, ModelId,
    PlanField, PlanModel, PlanPrimaryKey, PrimaryKeyDefinition, SchemaError,
};
pub use spec::{Arguments, GeneratorFn, NamedArgs, ValueContext, ValueError, ValueSpec};
pub use types::FieldType;
pub use values::{FieldValue, FieldValues, Instance, InstanceBuilder};
