mod harness;

use std::time::Duration;

use axum::http::StatusCode;
use gemwire_llm::{CallOptions, GeminiClient, LlmError, Message, ToolCall};
use harness::client_for;
use harness::mock_gemini::MockGemini;
use tokio_util::sync::CancellationToken;

const MODEL: &str = "gemini-3-flash";

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let mock = MockGemini::start().await.unwrap();
    mock.push_raw(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"rate limited"}"#);

    let client = client_for(&mock);
    let err = client
        .generate_content(MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    match &err {
        LlmError::Upstream { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, r#"{"error":"rate limited"}"#);
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert!(err.is_transport());
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn structured_provider_error_keeps_raw_body() {
    let mock = MockGemini::start().await.unwrap();
    mock.push_raw(
        StatusCode::BAD_REQUEST,
        r#"{"error":{"code":400,"message":"Function call is missing a thought_signature","status":"INVALID_ARGUMENT"}}"#,
    );

    let client = client_for(&mock);
    let err = client
        .generate_content(MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(err.to_string().contains("thought_signature"));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let mock = MockGemini::start().await.unwrap();
    mock.push_raw(StatusCode::OK, "{\"candidates\": [");

    let client = client_for(&mock);
    let err = client
        .generate_content(MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Parse(_)), "got {err:?}");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn malformed_arguments_fail_before_sending() {
    let mock = MockGemini::start().await.unwrap();

    let client = client_for(&mock);
    let history = [
        Message::user("Weather?"),
        Message::new(
            gemwire_llm::Role::Assistant,
            vec![ToolCall::new("call_0", "get_weather", "{not json").into()],
        ),
    ];
    let err = client
        .generate_content(MODEL, &history, &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::InvalidRequest(_)), "got {err:?}");
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = url::Url::parse(&format!("http://{addr}/v1beta")).unwrap();
    let client = GeminiClient::new("unused".to_owned()).with_base_url(base_url);

    let err = client
        .generate_content(MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Transport(_)), "got {err:?}");
    assert!(err.status().is_none());
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let mock = MockGemini::start_delayed(Duration::from_secs(10)).await.unwrap();
    mock.push_json(&serde_json::json!({"candidates": []}));

    let client = client_for(&mock);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    let err = client
        .generate_content_with_cancel(&cancel, MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Cancelled), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn already_cancelled_token_sends_nothing() {
    let mock = MockGemini::start().await.unwrap();

    let client = client_for(&mock);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .generate_content_with_cancel(&cancel, MODEL, &[Message::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Cancelled));
    assert!(mock.requests().is_empty());
}
