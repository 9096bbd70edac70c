//! Self-referencing models.

use crate::common::{adapters, init_tracing, SEED};
use fill_core::{FieldDefinition, FieldType, FieldValue, ModelDefinition, PrimaryKeyDefinition};
use fill_generator::provider;
use fill_populate::{MemoryStore, ModelRegistry};

fn categories() -> ModelDefinition {
    ModelDefinition::new(
        "categories",
        PrimaryKeyDefinition::auto(),
        vec![
            FieldDefinition::new("label", FieldType::Text),
            FieldDefinition::reference("parent", FieldType::Int64, "categories")
                .with_nullable(true),
        ],
    )
}

#[tokio::test]
async fn test_first_row_has_null_parent() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![categories()])).await?;
    registry.assign("categories", "label", provider::word())?;

    let report = registry.generate(&[4]).await?;
    assert_eq!(report.rows_inserted(), 4);

    let rows = store.rows("categories").await;
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].get_field("parent"), Some(&FieldValue::Null));

    // Later rows point at a row persisted before them.
    for row in &rows[1..] {
        let own = row.id.as_i64().expect("integer id");
        let parent = row
            .get_field("parent")
            .and_then(FieldValue::as_i64)
            .expect("parent is set once rows exist");
        assert!(parent < own, "parent {parent} is not older than {own}");
    }
    Ok(())
}

#[tokio::test]
async fn test_self_reference_does_not_block_scheduling() -> Result<(), Box<dyn std::error::Error>>
{
    init_tracing();
    let store = MemoryStore::new(SEED);
    let registry = ModelRegistry::register(adapters(&store, vec![categories()])).await?;
    assert_eq!(registry.planned_order()?.len(), 1);
    Ok(())
}
