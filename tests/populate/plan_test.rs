//! Fill plans driven end to end through the adapter registry.

use crate::common::init_tracing;
use fill_core::{FieldValue, Locale, ModelId};
use fill_populate::{CommonPopulateArgs, CountOverride, MemoryStore};
use mockfill::{
    check_plan, load_plan, populate_plan, resolve_counts, run_populate, AdapterRegistry,
    MemoryBackend, PopulateTarget,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

const BLOG_PLAN: &str = "tests/fixtures/blog_plan.yaml";

fn registry_with(store: &MemoryStore) -> AdapterRegistry {
    let mut registry = AdapterRegistry::with_available_backends();
    registry.register(Box::new(MemoryBackend::with_store(store.clone())));
    registry
}

#[tokio::test]
async fn test_blog_plan_populates_memory() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut plan = load_plan(Path::new(BLOG_PLAN))?;
    let counts = resolve_counts(&mut plan, &[])?;
    assert_eq!(counts, vec![5, 3]);

    let store = MemoryStore::new(plan.seed);
    let report = populate_plan(
        &registry_with(&store),
        &PopulateTarget::Memory,
        &plan,
        plan.seed,
        &counts,
    )
    .await?;

    assert_eq!(
        report.order(),
        vec![&ModelId::from("users"), &ModelId::from("posts")]
    );

    let users = store.rows("users").await;
    assert_eq!(users.len(), 3);
    let emails: Vec<&str> = users
        .iter()
        .filter_map(|u| u.get_field("email").and_then(FieldValue::as_str))
        .collect();
    assert_eq!(
        emails,
        vec!["user0@example.com", "user1@example.com", "user2@example.com"]
    );
    assert!(users
        .iter()
        .all(|u| u.get_field("bio") == Some(&FieldValue::Null)));

    let user_ids: HashSet<i64> = users.iter().filter_map(|u| u.id.as_i64()).collect();
    let posts = store.rows("posts").await;
    assert_eq!(posts.len(), 5);
    for post in &posts {
        assert!(post.id.as_uuid().is_some());
        assert!(post.get_field("published").and_then(FieldValue::as_bool).is_some());
        let author = post.get_field("author").and_then(FieldValue::as_i64);
        assert!(author.is_some_and(|a| user_ids.contains(&a)));
    }
    Ok(())
}

#[tokio::test]
async fn test_run_populate_applies_overrides() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut plan_file = tempfile::NamedTempFile::new()?;
    plan_file.write_all(std::fs::read_to_string(BLOG_PLAN)?.as_bytes())?;

    let common = CommonPopulateArgs {
        plan: plan_file.path().to_path_buf(),
        seed: Some(7),
        counts: vec![CountOverride {
            model: "posts".to_string(),
            count: 12,
        }],
        locale: None,
    };

    let store = MemoryStore::new(7);
    let report = run_populate(&registry_with(&store), PopulateTarget::Memory, &common).await?;

    assert_eq!(report.get("posts").map(|m| m.rows_inserted), Some(12));
    assert_eq!(report.get("users").map(|m| m.rows_inserted), Some(3));
    assert_eq!(store.rows("posts").await.len(), 12);
    Ok(())
}

#[tokio::test]
async fn test_negative_override_is_rejected_before_any_write(
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let common = CommonPopulateArgs {
        plan: BLOG_PLAN.into(),
        seed: None,
        counts: vec![CountOverride {
            model: "users".to_string(),
            count: -3,
        }],
        locale: None,
    };

    let store = MemoryStore::new(1);
    let err = run_populate(&registry_with(&store), PopulateTarget::Memory, &common)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must be >= 0"));
    assert!(!store.has_table("users").await);
    Ok(())
}

#[tokio::test]
async fn test_rerun_with_same_seed_continues_keys() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut plan = load_plan(Path::new(BLOG_PLAN))?;
    let counts = resolve_counts(&mut plan, &[])?;
    let store = MemoryStore::new(plan.seed);
    let registry = registry_with(&store);

    for _ in 0..2 {
        populate_plan(&registry, &PopulateTarget::Memory, &plan, plan.seed, &counts).await?;
    }

    let posts = store.rows("posts").await;
    let post_ids: HashSet<String> = posts.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(posts.len(), 10);
    assert_eq!(post_ids.len(), 10);

    let emails: Vec<String> = store
        .rows("users")
        .await
        .iter()
        .filter_map(|u| u.get_field("email").and_then(FieldValue::as_str).map(str::to_string))
        .collect();
    let expected: Vec<String> = (0..6).map(|i| format!("user{i}@example.com")).collect();
    assert_eq!(emails, expected);
    Ok(())
}

#[tokio::test]
async fn test_locale_override_changes_names() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let common = CommonPopulateArgs {
        plan: BLOG_PLAN.into(),
        seed: None,
        counts: vec![],
        locale: Some(Locale::ZhCn),
    };

    let store = MemoryStore::new(1);
    run_populate(&registry_with(&store), PopulateTarget::Memory, &common).await?;

    let users = store.rows("users").await;
    assert_eq!(users.len(), 3);
    for user in &users {
        let name = user.get_field("name").and_then(FieldValue::as_str);
        assert!(name.is_some_and(|n| !n.is_ascii()), "{name:?}");
    }
    Ok(())
}

#[test]
fn test_check_blog_plan() -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(Path::new(BLOG_PLAN))?;
    let order = check_plan(&plan)?;
    assert_eq!(order, vec![ModelId::from("users"), ModelId::from("posts")]);
    Ok(())
}

#[test]
fn test_invalid_plan_is_reported() {
    let mut plan_file = tempfile::NamedTempFile::new().unwrap();
    plan_file
        .write_all(
            b"models:\n  - name: posts\n    fields:\n      - name: author\n        type: big_int\n        references: users\n",
        )
        .unwrap();

    let err = load_plan(plan_file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("users"));
}
