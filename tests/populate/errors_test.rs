//! Error reporting of the register/assign/generate workflow.

use crate::common::{adapters, init_tracing, posts, users, SEED};
use fill_core::{FieldValue, ValueSpec};
use fill_generator::provider;
use fill_populate::{MemoryStore, ModelRegistry, PopulateError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_count_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users(), posts()])).await?;

    let err = registry.generate(&[1]).await.unwrap_err();
    assert!(matches!(
        err,
        PopulateError::ArgumentCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
    assert!(store.rows("users").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reference_to_empty_model() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users(), posts()])).await?;
    registry.assign("posts", "title", provider::word())?;

    let err = registry.generate(&[0, 2]).await.unwrap_err();
    assert!(matches!(
        err,
        PopulateError::EmptyReferenceTarget { ref target, .. } if target.as_str() == "users"
    ));
    assert!(store.rows("posts").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_assignment_errors() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users(), posts()])).await?;

    assert!(matches!(
        registry.assign("users", "nickname", provider::word()),
        Err(PopulateError::UnknownField { .. })
    ));
    assert!(matches!(
        registry.assign("posts", "author", provider::int_range(1, 3)),
        Err(PopulateError::ReferenceFieldAssignment { .. })
    ));
    assert!(matches!(
        registry.assign("comments", "body", provider::word()),
        Err(PopulateError::UnknownModel(_))
    ));

    // Reassignment replaces the previous specification.
    assert!(registry.assign("users", "name", provider::word())?.is_none());
    let previous = registry.assign("users", "name", provider::name())?;
    assert_eq!(previous.map(|spec| spec.name().to_string()), Some("word".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_unassigned_not_null_field_is_a_backend_error() -> Result<(), Box<dyn std::error::Error>>
{
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users()])).await?;

    let err = registry.generate(&[1]).await.unwrap_err();
    assert!(matches!(err, PopulateError::Backend(_)));
    Ok(())
}

#[tokio::test]
async fn test_generator_runs_once_per_instance() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users()])).await?;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let spec = ValueSpec::new("counted", move |ctx, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(FieldValue::String(format!("user-{}", ctx.index)))
    });
    registry.assign("users", "name", spec)?;

    registry.generate(&[6]).await?;
    assert_eq!(calls.load(Ordering::SeqCst), 6);

    let names: Vec<String> = store
        .rows("users")
        .await
        .iter()
        .filter_map(|u| u.get_field("name").and_then(FieldValue::as_str).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["user-0", "user-1", "user-2", "user-3", "user-4", "user-5"]);
    Ok(())
}
