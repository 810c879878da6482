// Tests for the HTTP assistant gateway: wire shape, retry with recovery,
// and terminal failure after exhausted attempts.

use huddle::{AssistantGateway, CompletionKind, Error, GatewayConfig, HttpAssistantGateway};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        endpoint: format!("{}/api/ai-assistant", server.uri()),
        meeting_id: "m1".to_string(),
        retry_attempts: 3,
        base_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn test_request_carries_kind_content_and_meeting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-assistant"))
        .and(body_json(json!({
            "type": "processCommand",
            "content": "create a task",
            "meetingId": "m1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": r#"{"type":"createTask","payload":"a task"}"#,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(config(&server));
    let result = gateway
        .complete(CompletionKind::ProcessCommand, "create a task")
        .await
        .unwrap();

    assert_eq!(result, r#"{"type":"createTask","payload":"a task"}"#);
}

#[tokio::test]
async fn test_recovers_within_retry_budget() {
    let server = MockServer::start().await;
    // Two transient failures, then success on the third attempt.
    Mock::given(method("POST"))
        .and(path("/api/ai-assistant"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ai-assistant"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": "recovered" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(config(&server));
    let result = gateway
        .complete(CompletionKind::GenerateSummary, "full transcript")
        .await
        .unwrap();

    assert_eq!(result, "recovered");
}

#[tokio::test]
async fn test_exhausted_retries_surface_terminal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-assistant"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(config(&server));
    let err = gateway
        .complete(CompletionKind::AnalyzeTranscript, "some text")
        .await
        .unwrap_err();

    match err {
        Error::Gateway { attempts, reason } => {
            assert_eq!(attempts, 3);
            assert!(reason.contains("500"));
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_retried_like_any_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai-assistant"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(3)
        .mount(&server)
        .await;

    let gateway = HttpAssistantGateway::new(config(&server));
    let err = gateway
        .complete(CompletionKind::ProcessCommand, "anything")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Gateway { attempts: 3, .. }));
}
