//! PostgreSQL backend for mockfill.
//!
//! Each model maps to one table. Tables are created with
//! `CREATE TABLE IF NOT EXISTS`, rows are inserted one at a time with
//! `RETURNING *` so auto-increment keys are read back, and random rows are
//! picked with `ORDER BY random()`.
//!
//! # Example
//!
//! ```ignore
//! let database = PostgreSQLDatabase::connect(
//!     "host=localhost user=postgres password=postgres dbname=testdb",
//! ).await?;
//! let adapters: Vec<Arc<dyn ModelIntrospector>> = plan
//!     .model_definitions()
//!     .into_iter()
//!     .map(|d| Arc::new(database.model(d)) as Arc<dyn ModelIntrospector>)
//!     .collect();
//! registry.register(adapters).await?;
//! ```

pub mod args;
pub mod ddl;
pub mod error;
pub mod model;
pub mod values;

pub use args::PostgreSQLPopulateArgs;
pub use error::PostgreSQLPopulatorError;
pub use model::{PostgreSQLDatabase, PostgreSQLModel};
