//! Reference fields are filled from rows that already exist.

use crate::common::{adapters, init_tracing, posts, users, SEED};
use fill_core::{FieldValue, ModelId};
use fill_generator::provider;
use fill_populate::{MemoryStore, ModelRegistry};
use std::collections::HashSet;

#[tokio::test]
async fn test_posts_reference_existing_users() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);

    // Posts registered first: the scheduler still generates users first.
    let mut registry = ModelRegistry::register(adapters(&store, vec![posts(), users()]))
        .await?
        .with_seed(SEED);
    registry.assign("users", "name", provider::name())?;
    registry.assign("posts", "title", provider::sentence(3, 6))?;

    let report = registry.generate(&[5, 3]).await?;

    assert_eq!(
        report.order(),
        vec![&ModelId::from("users"), &ModelId::from("posts")]
    );
    assert_eq!(report.get("users").map(|m| m.rows_inserted), Some(3));
    assert_eq!(report.get("posts").map(|m| m.rows_inserted), Some(5));
    assert_eq!(report.rows_inserted(), 8);

    let user_ids: HashSet<i64> = store
        .rows("users")
        .await
        .iter()
        .filter_map(|u| u.id.as_i64())
        .collect();
    assert_eq!(user_ids.len(), 3);

    let posts = store.rows("posts").await;
    assert_eq!(posts.len(), 5);
    for post in &posts {
        let author = post
            .get_field("author")
            .and_then(FieldValue::as_i64)
            .expect("author is set");
        assert!(user_ids.contains(&author), "unknown author {author}");
        assert!(post.get_field("title").and_then(FieldValue::as_str).is_some());
    }
    Ok(())
}

#[tokio::test]
async fn test_repeated_generate_appends_rows() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let store = MemoryStore::new(SEED);
    let mut registry = ModelRegistry::register(adapters(&store, vec![users(), posts()])).await?;
    registry.assign("users", "name", provider::first_name())?;
    registry.assign("posts", "title", provider::word())?;

    registry.generate(&[2, 1]).await?;
    registry.generate(&[0, 4]).await?;

    assert_eq!(store.rows("users").await.len(), 2);
    assert_eq!(store.rows("posts").await.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_same_seed_same_values() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut names = Vec::new();
    for _ in 0..2 {
        let store = MemoryStore::new(SEED);
        let mut registry = ModelRegistry::register(adapters(&store, vec![users()]))
            .await?
            .with_seed(7);
        registry.assign("users", "name", provider::name())?;
        registry.generate(&[4]).await?;
        let rows: Vec<FieldValue> = store
            .rows("users")
            .await
            .into_iter()
            .filter_map(|u| u.get_field("name").cloned())
            .collect();
        names.push(rows);
    }
    assert_eq!(names[0], names[1]);
    Ok(())
}
