//! HTTP oracle provider tests against a mock server.
//!
//! Exercises the transport failure modes the adapter must collapse into
//! typed failures: non-2xx responses, unparsable judgments, and timeouts.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use veri_common::config::OracleConfig;
use veri_engine::oracle::{ConsensusAdapter, HttpOracle, OracleFailure};
use veri_engine::types::{AnalysisRequest, DomainContext};

fn oracle_config(endpoint: String, timeout_secs: u64) -> OracleConfig {
    OracleConfig {
        provider: "http".into(),
        endpoint: Some(endpoint),
        api_key: Some("test-key".into()),
        model: "test-model".into(),
        timeout_secs,
        temperature: 0.3,
    }
}

fn adapter_for(server_uri: &str, timeout_secs: u64) -> ConsensusAdapter {
    let config = oracle_config(format!("{server_uri}/api/v1/consensus"), timeout_secs);
    let provider = HttpOracle::new(&config).expect("valid config");
    ConsensusAdapter::new(Arc::new(provider))
}

fn request() -> AnalysisRequest {
    AnalysisRequest::new(
        "The fund guarantees a fixed annual return regardless of market conditions.",
        DomainContext::Finance,
        false,
    )
}

#[tokio::test]
async fn successful_judgment_round_trip() {
    let server = MockServer::start().await;

    let judgment = r#"{
        "score": 34,
        "issues": [
            {"snippet": "guarantees a fixed annual return", "riskType": "compliance_gap",
             "explanation": "Guaranteed-return language triggers regulatory exposure.",
             "humanCheckHint": "Review with the compliance team."}
        ],
        "complianceReport": "Significant concerns identified.",
        "auditNote": "Logged for audit."
    }"#;

    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": judgment })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 5);
    let judgment = adapter.request_consensus(&request()).await.unwrap();

    assert_eq!(judgment.score, 34);
    assert_eq!(judgment.issues.len(), 1);
    assert_eq!(judgment.compliance_report, "Significant concerns identified.");
}

#[tokio::test]
async fn fenced_judgment_is_extracted() {
    let server = MockServer::start().await;

    let content = "Here is the analysis:\n```json\n{\"score\": 77, \"issues\": []}\n```";
    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": content })),
        )
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 5);
    let judgment = adapter.request_consensus(&request()).await.unwrap();
    assert_eq!(judgment.score, 77);
    assert!(judgment.issues.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_as_unreachable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 5);
    let err = adapter.request_consensus(&request()).await.unwrap_err();
    assert!(matches!(err, OracleFailure::Unreachable(_)), "got {err:?}");
}

#[tokio::test]
async fn connection_refused_surfaces_as_unreachable() {
    // Nothing listens on this port
    let adapter = adapter_for("http://127.0.0.1:9", 2);
    let err = adapter.request_consensus(&request()).await.unwrap_err();
    assert!(matches!(err, OracleFailure::Unreachable(_)), "got {err:?}");
}

#[tokio::test]
async fn prose_without_json_surfaces_as_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "content": "I cannot analyze this content, sorry." }),
        ))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 5);
    let err = adapter.request_consensus(&request()).await.unwrap_err();
    assert!(matches!(err, OracleFailure::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn non_judgment_body_surfaces_as_malformed() {
    let server = MockServer::start().await;

    // Valid HTTP envelope, but the response is not the expected shape
    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": 42 })),
        )
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 5);
    let err = adapter.request_consensus(&request()).await.unwrap_err();
    assert!(matches!(err, OracleFailure::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_oracle_surfaces_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/consensus"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "content": "{\"score\": 50}" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let adapter = adapter_for(&server.uri(), 1);
    let err = adapter.request_consensus(&request()).await.unwrap_err();
    assert!(matches!(err, OracleFailure::Timeout(_)), "got {err:?}");
}
