//! Tests for withdrawing posts against a mock LinkedIn API.

use postpilot_core::{
    DistributionStatus, GenerationStatus, GenerationUpdate, Network, NewDistributionRecord,
    NewGenerationRecord,
};
use postpilot_database::{InMemoryDistributionStore, InMemoryGenerationLogStore};
use postpilot_error::DistributionErrorKind;
use postpilot_interface::{DistributionStore, GenerationLogStore};
use postpilot_social::{DistributionWithdrawer, LinkedInSettings};
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    withdrawer: DistributionWithdrawer,
    distributions: Arc<InMemoryDistributionStore>,
    generations: Arc<InMemoryGenerationLogStore>,
}

fn harness(server: &MockServer) -> Harness {
    let distributions = Arc::new(InMemoryDistributionStore::new());
    let generations = Arc::new(InMemoryGenerationLogStore::new());
    let settings = LinkedInSettings::builder()
        .api_base_url(format!("{}/v2", server.uri()))
        .build()
        .unwrap();
    let withdrawer = DistributionWithdrawer::new(
        reqwest::Client::new(),
        settings,
        distributions.clone(),
        generations.clone(),
    );
    Harness {
        withdrawer,
        distributions,
        generations,
    }
}

/// A published generation and its live distribution record.
async fn published_post(h: &Harness, user: Uuid, external_id: &str) -> (Uuid, Uuid) {
    let generation = h
        .generations
        .create(NewGenerationRecord::started(user, "Rust"))
        .await
        .unwrap();
    for status in [GenerationStatus::Success, GenerationStatus::Published] {
        h.generations
            .update(*generation.id(), GenerationUpdate::status_only(status))
            .await
            .unwrap();
    }

    let mut attempt =
        NewDistributionRecord::attempt(user, Some(*generation.id()), Network::LinkedIn, "Hello");
    attempt.succeed(external_id);
    let distribution = h.distributions.create(attempt).await.unwrap();
    (*generation.id(), *distribution.id())
}

#[tokio::test]
async fn test_delete_by_generation_reconciles_both_records() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/ugcPosts/urn:li:share:123"))
        .and(header("authorization", "Bearer t1"))
        .and(header("x-restli-protocol-version", "2.0.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let (generation, distribution) = published_post(&h, user, "urn:li:share:123").await;

    h.withdrawer
        .delete(user, Some(generation), "t1", None)
        .await
        .unwrap();

    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Deleted);
    let records = h.distributions.all().await;
    let record = records.iter().find(|r| *r.id() == distribution).unwrap();
    assert_eq!(*record.status(), DistributionStatus::Deleted);
}

#[tokio::test]
async fn test_delete_with_explicit_id_resolves_record_by_external_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/ugcPosts/urn:li:share:555"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let (_, distribution) = published_post(&h, user, "urn:li:share:555").await;

    h.withdrawer
        .delete(user, None, "t1", Some("urn:li:share:555"))
        .await
        .unwrap();

    let records = h.distributions.all().await;
    let record = records.iter().find(|r| *r.id() == distribution).unwrap();
    assert_eq!(*record.status(), DistributionStatus::Deleted);
}

#[tokio::test]
async fn test_unknown_generation_is_not_found_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let err = h
        .withdrawer
        .delete(Uuid::new_v4(), Some(Uuid::new_v4()), "t1", Some(""))
        .await
        .unwrap_err();

    assert!(matches!(
        err.distribution_kind(),
        Some(DistributionErrorKind::NotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_attempt_does_not_resolve_a_post() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let generation = Uuid::new_v4();
    let mut attempt = NewDistributionRecord::attempt(user, Some(generation), Network::LinkedIn, "Hi");
    attempt.fail("linkedin api error: boom");
    h.distributions.create(attempt).await.unwrap();

    let err = h
        .withdrawer
        .delete(user, Some(generation), "t1", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.distribution_kind(),
        Some(DistributionErrorKind::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unauthorized_delete_is_credential_expired_and_changes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let (generation, _) = published_post(&h, user, "urn:li:share:9").await;

    let err = h
        .withdrawer
        .delete(user, Some(generation), "expired", None)
        .await
        .unwrap_err();

    assert!(err.is_credential_expired());
    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Published);
    assert_eq!(
        *h.distributions.all().await[0].status(),
        DistributionStatus::Success
    );
}

#[tokio::test]
async fn test_server_error_is_rejection_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let h = harness(&server);
    let err = h
        .withdrawer
        .delete(Uuid::new_v4(), None, "t1", Some("urn:li:share:1"))
        .await
        .unwrap_err();

    assert_eq!(
        err.distribution_kind(),
        Some(&DistributionErrorKind::Rejected {
            status: 500,
            body: "internal".to_string()
        })
    );
}

#[tokio::test]
async fn test_delete_succeeds_when_no_local_record_exists() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    h.withdrawer
        .delete(Uuid::new_v4(), Some(Uuid::new_v4()), "t1", Some("urn:li:share:orphan"))
        .await
        .unwrap();

    assert!(h.distributions.is_empty().await);
}

#[tokio::test]
async fn test_delete_leaves_errored_generation_errored() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/ugcPosts/urn:li:share:77"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let generation = h
        .generations
        .create(NewGenerationRecord::started(user, "Rust"))
        .await
        .unwrap();
    h.generations
        .update(*generation.id(), GenerationUpdate::status_only(GenerationStatus::Error))
        .await
        .unwrap();

    h.withdrawer
        .delete(user, Some(*generation.id()), "t1", Some("urn:li:share:77"))
        .await
        .unwrap();

    let generation = h.generations.get(*generation.id()).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Error);
}

#[tokio::test]
async fn test_unmatched_explicit_id_reconciles_generations_live_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v2/ugcPosts/urn:li:share:reposted"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let user = Uuid::new_v4();
    let (generation, distribution) = published_post(&h, user, "urn:li:share:original").await;

    h.withdrawer
        .delete(user, Some(generation), "t1", Some("urn:li:share:reposted"))
        .await
        .unwrap();

    let records = h.distributions.all().await;
    let record = records.iter().find(|r| *r.id() == distribution).unwrap();
    assert_eq!(*record.status(), DistributionStatus::Deleted);
    let generation = h.generations.get(generation).await.unwrap().unwrap();
    assert_eq!(*generation.status(), GenerationStatus::Deleted);
}
