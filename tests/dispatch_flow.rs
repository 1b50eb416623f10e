//! Request document -> REST directory -> Graph, against mock servers.

use httpmock::prelude::*;
use member_mailer::adapters::directory::RestDirectory;
use member_mailer::adapters::mail::{GraphCredentials, GraphMailer};
use member_mailer::adapters::request::parse_request;
use member_mailer::domain::{DomainError, EmailAddress};
use member_mailer::usecases::{AudienceResolver, BatchDispatcher, DispatchService, MessageRenderer};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const SEND_PATH: &str = "/users/announcements@cboa.ca/sendMail";

fn service(directory: &MockServer, graph: &MockServer) -> DispatchService {
    let timeout = Duration::from_secs(5);
    let rest = RestDirectory::new(directory.base_url(), "key".into(), timeout).unwrap();
    let mailer = GraphMailer::new(
        GraphCredentials {
            tenant_id: "tenant".into(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
        },
        graph.base_url(),
        graph.base_url(),
        true,
        timeout,
    )
    .unwrap();

    DispatchService::new(
        AudienceResolver::new(Arc::new(rest)),
        MessageRenderer::default(),
        BatchDispatcher::new(
            Arc::new(mailer),
            EmailAddress::parse("announcements@cboa.ca").unwrap(),
        ),
    )
}

async fn mock_token(graph: &MockServer) {
    graph
        .mock_async(|when, then| {
            when.method(POST).path("/tenant/oauth2/v2.0/token");
            then.status(200)
                .json_body(json!({"access_token": "tok", "expires_in": 3600}));
        })
        .await;
}

#[tokio::test]
async fn test_ranked_officials_plus_custom_address() {
    let directory = MockServer::start_async().await;
    let graph = MockServer::start_async().await;

    directory
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/members");
            then.status(200).json_body(json!([
                {"email": "A@X.com", "role": "official", "certification_level": "Level 3", "rank": 250},
                {"email": "b@x.com", "role": "official", "certification_level": "Level 1", "rank": 120},
                {"email": "c@x.com", "role": "executive", "certification_level": null, "rank": 300},
                {"email": "d@x.com", "role": "official", "certification_level": null, "rank": null}
            ]));
        })
        .await;
    mock_token(&graph).await;
    let send = graph
        .mock_async(|when, then| {
            when.method(POST)
                .path(SEND_PATH)
                .header("authorization", "Bearer tok")
                .body_contains(r#""bccRecipients":[{"emailAddress":{"address":"a@x.com"}},{"emailAddress":{"address":"guest@y.org"}}]"#)
                .body_contains("Playoff Assignments");
            then.status(202);
        })
        .await;

    let request = parse_request(
        r#"{
            "subject": "Playoff Assignments",
            "htmlContent": "<p>Assignments are posted.</p>",
            "recipientGroups": ["officials"],
            "rankFilter": "200+",
            "customEmails": ["a@x.com", "not-an-address", "Guest@Y.org"]
        }"#,
    )
    .unwrap();

    let outcome = service(&directory, &graph).send(&request).await.unwrap();

    send.assert_async().await;
    assert!(outcome.overall_succeeded);
    assert_eq!(outcome.recipient_count, 2);
    assert_eq!(outcome.summary(), "Email sent successfully to 2 recipients");
}

#[tokio::test]
async fn test_directory_outage_sends_nothing() {
    let directory = MockServer::start_async().await;
    let graph = MockServer::start_async().await;

    directory
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/members");
            then.status(500).body("boom");
        })
        .await;
    mock_token(&graph).await;
    let send = graph
        .mock_async(|when, then| {
            when.method(POST).path(SEND_PATH);
            then.status(202);
        })
        .await;

    let request = parse_request(
        r#"{"subject": "s", "htmlContent": "<p>b</p>", "recipientGroups": ["all"], "customEmails": ["x@y.com"]}"#,
    )
    .unwrap();

    let err = service(&directory, &graph).send(&request).await.unwrap_err();

    assert!(matches!(err, DomainError::DirectoryUnavailable(_)));
    assert_eq!(send.hits_async().await, 0);
}

#[tokio::test]
async fn test_provider_rejection_is_reported_per_batch() {
    let directory = MockServer::start_async().await;
    let graph = MockServer::start_async().await;

    mock_token(&graph).await;
    graph
        .mock_async(|when, then| {
            when.method(POST).path(SEND_PATH);
            then.status(403).body("ErrorAccessDenied");
        })
        .await;

    let request = parse_request(
        r#"{"subject": "s", "htmlContent": "<p>b</p>", "customEmails": ["x@y.com"]}"#,
    )
    .unwrap();

    let outcome = service(&directory, &graph).send(&request).await.unwrap();

    assert!(!outcome.overall_succeeded);
    assert_eq!(outcome.batch_results.len(), 1);
    assert_eq!(
        outcome.batch_results[0].error.as_deref(),
        Some("ErrorAccessDenied")
    );
}
