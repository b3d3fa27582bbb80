//! Tests for the in-memory record stores.

use postpilot_core::{
    DistributionStatus, GenerationStatus, GenerationUpdate, Network, NewDistributionRecord,
    NewGenerationRecord,
};
use postpilot_database::{InMemoryDistributionStore, InMemoryGenerationLogStore};
use postpilot_error::StoreErrorKind;
use postpilot_interface::{DistributionStore, GenerationLogStore};
use uuid::Uuid;

fn published(user: Uuid, generation: Option<Uuid>, external_id: &str) -> NewDistributionRecord {
    let mut record = NewDistributionRecord::attempt(user, generation, Network::LinkedIn, "hello");
    record.succeed(external_id);
    record
}

fn failed(user: Uuid, generation: Option<Uuid>) -> NewDistributionRecord {
    let mut record = NewDistributionRecord::attempt(user, generation, Network::LinkedIn, "hello");
    record.fail("linkedin api error: boom");
    record
}

#[tokio::test]
async fn test_create_assigns_id_and_started_status() {
    let store = InMemoryGenerationLogStore::new();
    let user = Uuid::new_v4();

    let record = store
        .create(NewGenerationRecord::started(user, "Rust 2024 edition"))
        .await
        .unwrap();

    assert_eq!(*record.status(), GenerationStatus::Started);
    assert_eq!(record.input(), "Rust 2024 edition");
    assert!(record.output().is_empty());
    assert_eq!(store.len().await, 1);

    let loaded = store.get(*record.id()).await.unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[tokio::test]
async fn test_update_applies_partial_changes() {
    let store = InMemoryGenerationLogStore::new();
    let record = store
        .create(NewGenerationRecord::started(Uuid::new_v4(), "topic"))
        .await
        .unwrap();

    store
        .update(
            *record.id(),
            GenerationUpdate::default()
                .with_output("post body".to_string())
                .with_model("gpt-4o-mini".to_string())
                .with_status(GenerationStatus::Success),
        )
        .await
        .unwrap();

    let loaded = store.get(*record.id()).await.unwrap().unwrap();
    assert_eq!(*loaded.status(), GenerationStatus::Success);
    assert_eq!(loaded.output(), "post body");
    assert_eq!(loaded.model(), "gpt-4o-mini");
    assert!(loaded.error().is_none());
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let store = InMemoryGenerationLogStore::new();
    let err = store
        .update(Uuid::new_v4(), GenerationUpdate::status_only(GenerationStatus::Deleted))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StoreErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_list_by_user_is_newest_first_limited_and_scoped() {
    let store = InMemoryGenerationLogStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for topic in ["first", "second", "third"] {
        store
            .create(NewGenerationRecord::started(alice, topic))
            .await
            .unwrap();
    }
    store
        .create(NewGenerationRecord::started(bob, "bob's topic"))
        .await
        .unwrap();

    let all = store.list_by_user(alice, 10).await.unwrap();
    let inputs: Vec<&str> = all.iter().map(|r| r.input().as_str()).collect();
    assert_eq!(inputs, vec!["third", "second", "first"]);

    let limited = store.list_by_user(alice, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].input(), "third");

    assert!(store.list_by_user(alice, 0).await.unwrap().is_empty());
    assert_eq!(store.list_by_user(bob, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_distribution_history_is_append_only() {
    let store = InMemoryDistributionStore::new();
    let user = Uuid::new_v4();
    let generation = Uuid::new_v4();

    store.create(failed(user, Some(generation))).await.unwrap();
    store
        .create(published(user, Some(generation), "urn:li:share:1"))
        .await
        .unwrap();

    assert_eq!(store.len().await, 2);
    assert_eq!(store.list_by_user(user, 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_find_by_generation_id_returns_latest_live_post() {
    let store = InMemoryDistributionStore::new();
    let user = Uuid::new_v4();
    let generation = Uuid::new_v4();

    store
        .create(published(user, Some(generation), "urn:li:share:old"))
        .await
        .unwrap();
    store
        .create(published(user, Some(generation), "urn:li:share:new"))
        .await
        .unwrap();
    // A later failed retry must not hide the live post.
    store.create(failed(user, Some(generation))).await.unwrap();

    let found = store.find_by_generation_id(generation).await.unwrap().unwrap();
    assert_eq!(found.external_post_id().as_deref(), Some("urn:li:share:new"));

    assert!(
        store
            .find_by_generation_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_find_by_generation_id_ignores_failed_attempts() {
    let store = InMemoryDistributionStore::new();
    let generation = Uuid::new_v4();
    store
        .create(failed(Uuid::new_v4(), Some(generation)))
        .await
        .unwrap();

    assert!(store.find_by_generation_id(generation).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_external_id_and_update_status() {
    let store = InMemoryDistributionStore::new();
    let user = Uuid::new_v4();
    let created = store
        .create(published(user, None, "urn:li:share:9"))
        .await
        .unwrap();

    let found = store
        .find_by_external_id("urn:li:share:9")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), created.id());
    assert!(store.find_by_external_id("urn:li:share:0").await.unwrap().is_none());

    store
        .update_status(*created.id(), DistributionStatus::Deleted)
        .await
        .unwrap();
    let all = store.all().await;
    assert_eq!(*all[0].status(), DistributionStatus::Deleted);
    assert!(all[0].updated_at() >= created.updated_at());

    let err = store
        .update_status(Uuid::new_v4(), DistributionStatus::Deleted)
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StoreErrorKind::NotFound(_)));
}

#[tokio::test]
async fn test_update_refuses_to_move_a_deleted_generation() {
    let store = InMemoryGenerationLogStore::new();
    let record = store
        .create(NewGenerationRecord::started(Uuid::new_v4(), "topic"))
        .await
        .unwrap();
    for status in [GenerationStatus::Success, GenerationStatus::Deleted] {
        store
            .update(*record.id(), GenerationUpdate::status_only(status))
            .await
            .unwrap();
    }

    let err = store
        .update(
            *record.id(),
            GenerationUpdate::default()
                .with_status(GenerationStatus::Published)
                .with_output("late".to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind, StoreErrorKind::InvalidTransition(_)));
    let loaded = store.get(*record.id()).await.unwrap().unwrap();
    assert_eq!(*loaded.status(), GenerationStatus::Deleted);
    assert!(loaded.output().is_empty());
}

#[tokio::test]
async fn test_update_status_refuses_to_delete_a_failed_attempt() {
    let store = InMemoryDistributionStore::new();
    let created = store.create(failed(Uuid::new_v4(), None)).await.unwrap();

    let err = store
        .update_status(*created.id(), DistributionStatus::Deleted)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, StoreErrorKind::InvalidTransition(_)));
    assert_eq!(*store.all().await[0].status(), DistributionStatus::Error);
}
