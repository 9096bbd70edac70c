//! Shared fixtures.

use fill_core::{FieldDefinition, FieldType, ModelDefinition, PrimaryKeyDefinition};
use fill_populate::{MemoryStore, ModelIntrospector};
use std::sync::Arc;

pub const SEED: u64 = 42;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("mockfill=debug,fill_populate=debug")
        .try_init()
        .ok();
}

pub fn users() -> ModelDefinition {
    ModelDefinition::new(
        "users",
        PrimaryKeyDefinition::auto(),
        vec![FieldDefinition::new("name", FieldType::varchar(100))],
    )
}

pub fn posts() -> ModelDefinition {
    ModelDefinition::new(
        "posts",
        PrimaryKeyDefinition::auto(),
        vec![
            FieldDefinition::new("title", FieldType::Text),
            FieldDefinition::reference("author", FieldType::Int64, "users"),
        ],
    )
}

pub fn adapters(
    store: &MemoryStore,
    definitions: Vec<ModelDefinition>,
) -> Vec<Arc<dyn ModelIntrospector>> {
    definitions
        .into_iter()
        .map(|d| Arc::new(store.model(d)) as Arc<dyn ModelIntrospector>)
        .collect()
}
