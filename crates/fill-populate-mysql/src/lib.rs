//! MySQL backend for mockfill.
//!
//! Each model maps to one InnoDB table with real foreign keys. Inserted
//! rows are read back by key so column defaults and `AUTO_INCREMENT` values
//! show up in the returned instance.

pub mod args;
pub mod ddl;
pub mod error;
pub mod model;
pub mod values;

pub use args::MySQLPopulateArgs;
pub use error::MySQLPopulatorError;
pub use model::{MySQLDatabase, MySQLModel};
