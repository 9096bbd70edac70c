//! Cyclic references between models.

use crate::common::{adapters, init_tracing, SEED};
use fill_core::{FieldDefinition, FieldType, ModelDefinition, ModelId, PrimaryKeyDefinition};
use fill_populate::{MemoryStore, ModelRegistry, PopulateError};

fn pointing_at(name: &str, target: &str) -> ModelDefinition {
    ModelDefinition::new(
        name,
        PrimaryKeyDefinition::auto(),
        vec![FieldDefinition::reference("other", FieldType::Int64, target)],
    )
}

#[tokio::test]
async fn test_two_model_cycle_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(
        &store,
        vec![pointing_at("a", "b"), pointing_at("b", "a")],
    ))
    .await?;

    let err = registry.generate(&[1, 1]).await.unwrap_err();
    match err {
        PopulateError::CyclicDependency { models } => {
            assert_eq!(models, vec![ModelId::from("a"), ModelId::from("b")]);
        }
        other => panic!("Expected CyclicDependency, got {other:?}"),
    }

    assert!(store.rows("a").await.is_empty());
    assert!(store.rows("b").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_independent_models_are_generated_before_the_cycle_is_hit(
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let tags = ModelDefinition::new("tags", PrimaryKeyDefinition::auto(), vec![]);
    let mut registry = ModelRegistry::register(adapters(
        &store,
        vec![pointing_at("a", "b"), tags, pointing_at("b", "a")],
    ))
    .await?;

    let err = registry.generate(&[1, 2, 1]).await.unwrap_err();
    assert!(matches!(err, PopulateError::CyclicDependency { .. }));
    assert_eq!(store.rows("tags").await.len(), 2);
    Ok(())
}
