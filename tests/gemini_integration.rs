use std::io::Cursor;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use httpmock::{Method::POST, MockServer};
use notecraft::{
    api::create_router, provider::GeminiClient, service::StudyService, storage::UploadStore,
    transcription::PlaceholderTranscriber,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const MODEL_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn app(server: &MockServer, upload_dir: &std::path::Path) -> Router {
    let provider =
        GeminiClient::new(server.base_url(), "integration-key", "gemini-2.0-flash").expect("client");
    let service = StudyService::new(
        Arc::new(provider),
        Arc::new(PlaceholderTranscriber),
        UploadStore::new(upload_dir),
    );
    create_router(Arc::new(service), 5 * 1024 * 1024)
}

fn canvas_data_uri() -> String {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb([250, 250, 250]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    format!("data:image/png;base64,{}", STANDARD.encode(bytes.into_inner()))
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

#[tokio::test]
async fn handwriting_is_forwarded_as_inline_jpeg() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .header("x-goog-api-key", "integration-key")
                .body_contains("\"mimeType\":\"image/jpeg\"")
                .body_contains("Extract the handwritten text from this image.");
            then.status(200).json_body(candidate("  Photosynthesis notes \n"));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");

    let response = app(&server, dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/convert-handwriting")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "image_base64": canvas_data_uri() }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["text"], "Photosynthesis notes");
}

#[tokio::test]
async fn voice_upload_runs_summary_and_keyword_prompts() {
    let server = MockServer::start_async().await;
    let summary = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .body_contains("Summarize the following:");
            then.status(200).json_body(candidate("Mitochondria make ATP."));
        })
        .await;
    let keywords = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .body_contains("educational keywords");
            then.status(200)
                .json_body(candidate("- mitochondria\n- ATP\n- cell biology"));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let boundary = "integration-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"lecture.webm\"\r\nContent-Type: audio/webm\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(b"fake-audio");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app(&server, dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/voice/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");

    summary.assert_async().await;
    keywords.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["summary"], "Mitochondria make ATP.");
    assert_eq!(json["images"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["images"][2]["alt"], "cell biology");
    assert!(dir.path().join("lecture.webm").exists());
}

#[tokio::test]
async fn provider_error_becomes_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(429).json_body(json!({
                "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
            }));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");

    let response = app(&server, dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "prompt": "Explain osmosis" }).to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(response).await["error"]
        .as_str()
        .expect("error message")
        .to_string();
    assert!(error.contains("Resource has been exhausted"), "{error}");
}

#[tokio::test]
#[ignore = "Requires GEMINI_API_KEY and network access"]
async fn live_gemini_chat_roundtrip() {
    dotenvy::dotenv().ok();
    let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    let client = GeminiClient::new(
        notecraft::config::DEFAULT_BASE_URL,
        api_key,
        notecraft::config::DEFAULT_MODEL,
    )
    .expect("client");
    let reply = notecraft::provider::GenerativeClient::generate(
        &client,
        notecraft::provider::PromptRequest::text("Reply with the single word: ready"),
    )
    .await
    .expect("live reply");
    assert!(!reply.is_empty());
}
