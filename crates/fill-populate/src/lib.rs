//! Dependency-ordered generation of mock instances.
//!
//! This crate is the engine of mockfill. Callers register one
//! [`ModelIntrospector`] per model, assign [`ValueSpec`](fill_core::ValueSpec)s
//! to value fields and ask for a number of instances per model:
//!
//! ```text
//! register(adapters) ──▶ ModelDescriptor per model
//!        │
//! assign(model, field, spec) ──▶ FieldAssignments
//!        │
//! generate(counts) ──▶ ProcessingQueue ──▶ InstanceGenerator per model
//!                                              │
//!                                              ├─ value fields: resolve spec
//!                                              └─ reference fields: random existing row
//! ```
//!
//! Backend adapters live in their own crates; [`memory`] provides an
//! in-memory one.

pub mod args;
pub mod assignments;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod introspect;
pub mod memory;
pub mod metrics;
pub mod registry;
pub mod scheduler;

pub use args::{CommonPopulateArgs, CountOverride};
pub use assignments::FieldAssignments;
pub use descriptor::ModelDescriptor;
pub use error::{BackendError, PopulateError};
pub use instance::{InstanceGenerator, IntrospectorMap};
pub use introspect::{BackendKind, ModelIntrospector};
pub use memory::{MemoryModel, MemoryStore};
pub use metrics::{GenerationReport, ModelReport};
pub use registry::{ModelRegistry, DEFAULT_SEED};
pub use scheduler::{planned_order, ProcessingQueue, ProcessingState};
