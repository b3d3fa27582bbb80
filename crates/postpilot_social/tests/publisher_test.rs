//! Tests for publishing against a mock LinkedIn API.

use postpilot_core::{DistributionStatus, GenerationStatus, GenerationUpdate, NewGenerationRecord};
use postpilot_database::{InMemoryDistributionStore, InMemoryGenerationLogStore};
use postpilot_error::DistributionErrorKind;
use postpilot_interface::GenerationLogStore;
use postpilot_social::{DistributionPublisher, LinkedInSettings};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTHOR: &str = "urn:li:person:42";

struct Harness {
    publisher: DistributionPublisher,
    distributions: Arc<InMemoryDistributionStore>,
    generations: Arc<InMemoryGenerationLogStore>,
}

fn harness(base_url: &str) -> Harness {
    let distributions = Arc::new(InMemoryDistributionStore::new());
    let generations = Arc::new(InMemoryGenerationLogStore::new());
    let settings = LinkedInSettings::builder()
        .api_base_url(base_url)
        .build()
        .unwrap();
    let publisher = DistributionPublisher::new(
        reqwest::Client::new(),
        settings,
        distributions.clone(),
        generations.clone(),
    );
    Harness {
        publisher,
        distributions,
        generations,
    }
}

async fn successful_generation(store: &InMemoryGenerationLogStore, user: Uuid) -> Uuid {
    let record = store
        .create(NewGenerationRecord::started(user, "Rust"))
        .await
        .unwrap();
    store
        .update(
            *record.id(),
            GenerationUpdate::default()
                .with_output("Hello world".to_string())
                .with_status(GenerationStatus::Success),
        )
        .await
        .unwrap();
    *record.id()
}

#[tokio::test]
async fn test_publish_returns_id_from_body_and_marks_generation_published() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ugcPosts"))
        .and(header("authorization", "Bearer t1"))
        .and(header("x-restli-protocol-version", "2.0.0"))
        .and(body_partial_json(json!({
            "author": AUTHOR,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {"shareCommentary": {"text": "Hello world"}}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "urn:li:share:123"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&format!("{}/v2", server.uri()));
    let user = Uuid::new_v4();
    let generation = successful_generation(&h.generations, user).await;

    let id = h
        .publisher
        .publish(user, Some(generation), "t1", AUTHOR, "Hello world")
        .await
        .unwrap();

    assert_eq!(id, "urn:li:share:123");
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].status(), DistributionStatus::Success);
    assert_eq!(records[0].external_post_id().as_deref(), Some("urn:li:share:123"));
    assert_eq!(*records[0].generation_id(), Some(generation));
    assert_eq!(records[0].payload()["author"], AUTHOR);
    assert_eq!(
        records[0].response().as_ref().unwrap()["id"],
        "urn:li:share:123"
    );

    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Published);
    assert!(generation.published_at().is_some());
}

#[tokio::test]
async fn test_publish_falls_back_to_restli_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ugcPosts"))
        .respond_with(ResponseTemplate::new(201).insert_header("x-restli-id", "urn:li:share:777"))
        .mount(&server)
        .await;

    let h = harness(&format!("{}/v2", server.uri()));
    let id = h
        .publisher
        .publish(Uuid::new_v4(), None, "t1", AUTHOR, "Hello")
        .await
        .unwrap();

    assert_eq!(id, "urn:li:share:777");
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].status(), DistributionStatus::Success);
    assert!(records[0].response().is_none());
}

#[tokio::test]
async fn test_success_without_id_is_ambiguous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let h = harness(&format!("{}/v2", server.uri()));
    let user = Uuid::new_v4();
    let generation = successful_generation(&h.generations, user).await;

    let err = h
        .publisher
        .publish(user, Some(generation), "t1", AUTHOR, "Hello")
        .await
        .unwrap_err();

    assert_eq!(
        err.distribution_kind(),
        Some(&DistributionErrorKind::AmbiguousSuccess)
    );
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].status(), DistributionStatus::Error);
    assert_eq!(
        records[0].error().as_deref(),
        Some("Unknown error: no post ID returned")
    );
    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Success);
}

#[tokio::test]
async fn test_unauthorized_is_credential_expired() {
    for status in [401u16, 403] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"message": "token expired"})),
            )
            .mount(&server)
            .await;

        let h = harness(&format!("{}/v2", server.uri()));
        let err = h
            .publisher
            .publish(Uuid::new_v4(), None, "expired", AUTHOR, "Hello")
            .await
            .unwrap_err();

        assert!(err.is_credential_expired(), "status {}", status);
        let records = h.distributions.all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(*records[0].status(), DistributionStatus::Error);
        assert!(records[0].error().as_deref().unwrap().contains("reconnect"));
        assert_eq!(
            records[0].response().as_ref().unwrap()["message"],
            "token expired"
        );
    }
}

#[tokio::test]
async fn test_rejection_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("duplicate post"))
        .mount(&server)
        .await;

    let h = harness(&format!("{}/v2", server.uri()));
    let err = h
        .publisher
        .publish(Uuid::new_v4(), None, "t1", AUTHOR, "Hello")
        .await
        .unwrap_err();

    assert_eq!(
        err.distribution_kind(),
        Some(&DistributionErrorKind::Rejected {
            status: 422,
            body: "duplicate post".to_string()
        })
    );
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].error().as_deref(),
        Some("linkedin api error: duplicate post")
    );
    assert!(records[0].response().is_none());
}

#[tokio::test]
async fn test_transport_failure_is_recorded() {
    let h = harness("http://127.0.0.1:1/v2");
    let err = h
        .publisher
        .publish(Uuid::new_v4(), None, "t1", AUTHOR, "Hello")
        .await
        .unwrap_err();

    assert!(matches!(
        err.distribution_kind(),
        Some(DistributionErrorKind::Transport(_))
    ));
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].status(), DistributionStatus::Error);
    assert_eq!(records[0].payload()["author"], AUTHOR);
}

#[tokio::test]
async fn test_unbuildable_request_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&format!("{}/v2", server.uri()));
    let err = h
        .publisher
        .publish(Uuid::new_v4(), None, "bad\ntoken", AUTHOR, "Hello")
        .await
        .unwrap_err();

    assert!(matches!(
        err.distribution_kind(),
        Some(DistributionErrorKind::RequestBuild(_))
    ));
    assert_eq!(h.distributions.len().await, 1);
}

async fn accepting_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ugcPosts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "urn:li:share:321"})))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_publish_succeeds_when_generation_update_fails() {
    let server = accepting_server().await;
    let h = harness(&format!("{}/v2", server.uri()));

    let id = h
        .publisher
        .publish(Uuid::new_v4(), Some(Uuid::new_v4()), "t1", AUTHOR, "Hello")
        .await
        .unwrap();

    assert_eq!(id, "urn:li:share:321");
    let records = h.distributions.all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(*records[0].status(), DistributionStatus::Success);
    assert!(h.generations.is_empty().await);
}

#[tokio::test]
async fn test_publish_leaves_deleted_generation_deleted() {
    let server = accepting_server().await;
    let h = harness(&format!("{}/v2", server.uri()));
    let user = Uuid::new_v4();
    let generation = successful_generation(&h.generations, user).await;
    h.generations
        .update(generation, GenerationUpdate::status_only(GenerationStatus::Deleted))
        .await
        .unwrap();

    h.publisher
        .publish(user, Some(generation), "t1", AUTHOR, "Hello world")
        .await
        .unwrap();

    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Deleted);
    assert!(generation.published_at().is_none());
    assert_eq!(h.distributions.len().await, 1);
}

#[tokio::test]
async fn test_publish_leaves_errored_generation_errored() {
    let server = accepting_server().await;
    let h = harness(&format!("{}/v2", server.uri()));
    let user = Uuid::new_v4();
    let record = h
        .generations
        .create(NewGenerationRecord::started(user, "Rust"))
        .await
        .unwrap();
    h.generations
        .update(
            *record.id(),
            GenerationUpdate::default()
                .with_status(GenerationStatus::Error)
                .with_error("provider unavailable".to_string()),
        )
        .await
        .unwrap();

    h.publisher
        .publish(user, Some(*record.id()), "t1", AUTHOR, "Hand-written text")
        .await
        .unwrap();

    let generation = h.generations.get(*record.id()).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Error);
    assert_eq!(generation.error().as_deref(), Some("provider unavailable"));
    assert!(generation.published_at().is_none());
}
