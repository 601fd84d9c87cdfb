//! API endpoint integration tests

use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use snooze_bridge::api::{self, bridge::READY_MESSAGE};
use snooze_bridge::{ApiState, ReplyGenerator, RuntimeLocator, SpeechLauncher};
use tower::ServiceExt;

mod common;
use common::{StubGenerator, get, json_body, post_json, write_script};

const REPLY: &str = "Come on, you've got this! Don't quit now.";

/// Build a test API router around a stub generator and a script run by `sh`
fn build_test_router(generator: Arc<dyn ReplyGenerator>, script: &Path) -> axum::Router {
    let speech = SpeechLauncher::new(script, RuntimeLocator::new("sh", vec![]));
    api::router(Arc::new(ApiState::new(generator, speech)))
}

#[tokio::test]
async fn test_home_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_router(StubGenerator::replying(REPLY), &dir.path().join("tts.sh"));

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], READY_MESSAGE.as_bytes());
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_router(StubGenerator::replying(REPLY), &dir.path().join("tts.sh"));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_missing_or_blank_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::replying(REPLY);
    let app = build_test_router(generator.clone(), &dir.path().join("tts.sh"));

    for body in [r"{}", r#"{"text": ""}"#, r#"{"text": "   "}"#, r#"{"text": null}"#] {
        let response = app.clone().oneshot(post_json("/gemini", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let json = json_body(response).await;
        assert_eq!(json["error"], "No text provided");
    }

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_non_object_or_non_string_text_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = StubGenerator::replying(REPLY);
    let app = build_test_router(generator.clone(), &dir.path().join("tts.sh"));

    for body in ["not json", r#""pep talk""#, "[]", "42", r#"{"text": 5}"#, r#"{"text": ["pep talk"]}"#] {
        let response = app.clone().oneshot(post_json("/gemini", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let json = json_body(response).await;
        assert_eq!(json["error"], "No text provided", "body: {body}");
    }

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_router(StubGenerator::replying(REPLY), &dir.path().join("tts.sh"));

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/gemini")
        .body(axum::body::Body::from(r#"{"text": "pep talk"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No text provided");
}

#[tokio::test]
async fn test_latest_before_any_interaction() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_router(StubGenerator::replying(REPLY), &dir.path().join("tts.sh"));

    let response = app.oneshot(get("/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["message"], "No previous interaction yet.");
}

#[cfg(unix)]
#[tokio::test]
async fn test_round_trip_speaks_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "printf '%s' \"$1\" > spoken.txt\n");
    let app = build_test_router(StubGenerator::replying(REPLY), &script);

    let response = app
        .clone()
        .oneshot(post_json("/gemini", r#"{"text": "  pep talk "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["input"], "pep talk");
    assert_eq!(json["response"], REPLY);
    assert_eq!(json["tts_status"], "completed");
    assert!(json["message"].is_string());

    let spoken = std::fs::read_to_string(dir.path().join("spoken.txt")).unwrap();
    assert_eq!(spoken, REPLY);

    let response = app.oneshot(get("/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["input"], "pep talk");
    assert_eq!(json["response"], REPLY);
}

#[cfg(unix)]
#[tokio::test]
async fn test_latest_tracks_most_recent_call() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 0\n");
    let app = build_test_router(StubGenerator::replying(REPLY), &script);

    for intent in ["pep talk", "scary voice"] {
        let body = format!(r#"{{"text": "{intent}"}}"#);
        let response = app.clone().oneshot(post_json("/gemini", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = json_body(app.oneshot(get("/latest")).await.unwrap()).await;
    assert_eq!(json["input"], "scary voice");
}

#[tokio::test]
async fn test_missing_script_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("tts.js");
    let app = build_test_router(StubGenerator::replying(REPLY), &script);

    let response = app
        .clone()
        .oneshot(post_json("/gemini", r#"{"text": "motivation"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&script.display().to_string()), "error: {error}");

    // Partial failure leaves the cache untouched
    let response = app.oneshot(get("/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_runtime_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 0\n");
    let speech = SpeechLauncher::new(
        &script,
        RuntimeLocator::new("snooze-bridge-missing-node", vec![dir.path().join("node")]),
    );
    let app = api::router(Arc::new(ApiState::new(StubGenerator::replying(REPLY), speech)));

    let response = app.oneshot(post_json("/gemini", r#"{"text": "pep talk"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("snooze-bridge-missing-node"), "error: {error}");
}

#[cfg(unix)]
#[tokio::test]
async fn test_language_model_failure_skips_speech() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "touch ran.txt\n");
    let app = build_test_router(StubGenerator::failing("API key not valid"), &script);

    let response = app.oneshot(post_json("/gemini", r#"{"text": "pep talk"}"#)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("API key not valid"));
    assert!(!dir.path().join("ran.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_synthesis_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'quota exceeded' >&2\nexit 1\n");
    let app = build_test_router(StubGenerator::replying(REPLY), &script);

    let response = app
        .clone()
        .oneshot(post_json("/gemini", r#"{"text": "pep talk"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("quota exceeded"));

    let response = app.oneshot(get("/latest")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
