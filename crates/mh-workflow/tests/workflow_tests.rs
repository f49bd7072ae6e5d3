//! End-to-end workflow tests against a wiremock Monzo API
//!
//! Tests for:
//! - Deletion across accounts with partial listing and deletion failures
//! - Registration across accounts with one rejected registration
//! - Abort on account listing failure

use mh_config::MonzoConfig;
use mh_workflow::{DeletionWorkflow, RegistrationWorkflow, WorkflowError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> MonzoConfig {
    MonzoConfig::new("e2e-token").with_api_base_url(server.uri())
}

async fn mount_accounts(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header("authorization", "Bearer e2e-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accounts": [
                {"id": "acc_1", "description": "Personal"},
                {"id": "acc_2", "description": "Joint"},
                {"id": "acc_3"}
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_deletion_end_to_end() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;

    Mock::given(method("GET"))
        .and(path("/webhooks"))
        .and(query_param("account_id", "acc_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhooks": [
                {"id": "wh_1", "account_id": "acc_1", "url": "https://a.example/hook"},
                {"id": "wh_2", "account_id": "acc_1", "url": "https://b.example/hook"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webhooks"))
        .and(query_param("account_id", "acc_2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webhooks"))
        .and(query_param("account_id", "acc_3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhooks": [{"id": "wh_3", "account_id": "acc_3", "url": "https://c.example/hook"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/webhooks/wh_1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/wh_2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/wh_3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = DeletionWorkflow::from_config(config_for(&server)).unwrap();
    let mut out = Vec::new();
    let summary = workflow.run(&mut out).await.unwrap();
    let output = String::from_utf8(out).unwrap();

    assert_eq!(summary.accounts, 3);
    assert_eq!(summary.accounts_skipped, 1);
    assert_eq!(summary.found, 3);
    assert_eq!(summary.deleted, 2);
    assert_eq!(summary.failed(), 1);
    assert!(output.contains("Processing account: Unknown (acc_3)"));
    assert!(output.contains("  Total webhooks found: 3"));
    assert!(output.contains("  Successfully deleted: 2"));
    assert!(output.contains("  Failed to delete: 1"));
}

#[tokio::test]
async fn test_registration_end_to_end() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;

    for account in ["acc_1", "acc_3"] {
        Mock::given(method("POST"))
            .and(path("/webhooks"))
            .and(body_string_contains(format!("account_id={}", account)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "webhook": {
                    "id": format!("wh_{}", account),
                    "account_id": account,
                    "url": "https://example.com/webhook"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_string_contains("account_id=acc_2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = RegistrationWorkflow::from_config(config_for(&server)).unwrap();
    let mut out = Vec::new();
    let summary = workflow
        .run("https://example.com/webhook", &mut out)
        .await
        .unwrap();

    assert_eq!(summary.registered, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.webhook_ids, vec!["wh_acc_1", "wh_acc_3"]);
}

#[tokio::test]
async fn test_registration_without_webhook_id() {
    let server = MockServer::start().await;
    mount_accounts(&server).await;

    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_string_contains("account_id=acc_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhook": {"url": "https://example.com/webhook"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_string_contains("account_id=acc_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_string_contains("account_id=acc_3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let workflow = RegistrationWorkflow::from_config(config_for(&server)).unwrap();
    let mut out = Vec::new();
    let summary = workflow
        .run("https://example.com/webhook", &mut out)
        .await
        .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert_eq!(summary.registered, 1);
    assert_eq!(summary.failed, 2);
    assert!(summary.webhook_ids.is_empty());
    assert!(output.contains("  ✓ Successfully registered webhook\n    Webhook ID: Unknown"));
    assert!(output.contains("  Successfully registered: 1"));
    assert!(output.contains("  Failed to register: 2"));
}

#[tokio::test]
async fn test_registration_rejects_url_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = RegistrationWorkflow::from_config(config_for(&server)).unwrap();
    let mut out = Vec::new();
    let result = workflow.run("ftp://x.com/hook", &mut out).await;

    assert!(matches!(result, Err(WorkflowError::Config(_))));
}

#[tokio::test]
async fn test_deletion_aborts_when_accounts_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let workflow = DeletionWorkflow::from_config(config_for(&server)).unwrap();
    let mut out = Vec::new();
    let result = workflow.run(&mut out).await;

    assert!(matches!(result, Err(WorkflowError::AccountsUnavailable(_))));
}
