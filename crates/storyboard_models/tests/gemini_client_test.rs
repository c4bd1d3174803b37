//! Tests for the Gemini client against a local stub server.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use storyboard_core::{GenerateRequest, ImageRequestBuilder, Output, ResponseFormat};
use storyboard_error::{GeminiErrorKind, RetryableError, StoryboardErrorKind};
use storyboard_interface::GenerativeDriver;
use storyboard_models::{GeminiClient, resolve_api_key_from};

#[derive(Debug, Clone)]
struct Recorded {
    call: String,
    api_key: Option<String>,
    body: Value,
}

type Calls = Arc<Mutex<Vec<Recorded>>>;

async fn handle(
    State(calls): State<Calls>,
    Path(call): Path<String>,
    headers: HeaderMap,
    body: axum::Json<Value>,
) -> Response {
    calls.lock().unwrap().push(Recorded {
        call: call.clone(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: body.0,
    });

    match call.as_str() {
        "gemini-2.5-flash:generateContent" => axum::Json(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "{\"characters\": [], \"scenes\": []}"}
            ]}}]
        }))
        .into_response(),
        "gemini-2.5-flash-image:generateContent" => axum::Json(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(b"png")}}
            ]}}]
        }))
        .into_response(),
        "imagen-4.0-generate-001:predict" => axum::Json(json!({
            "predictions": [{"bytesBase64Encoded": STANDARD.encode(b"jpeg"), "mimeType": "image/jpeg"}]
        }))
        .into_response(),
        "overloaded:generateContent" => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(json!({"error": {
                "code": 503,
                "message": "The model is overloaded. Please try again later.",
                "status": "UNAVAILABLE"
            }})),
        )
            .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({"error": {
                "code": 400,
                "message": "Unknown model",
                "status": "INVALID_ARGUMENT"
            }})),
        )
            .into_response(),
    }
}

async fn spawn_stub() -> anyhow::Result<(String, Calls)> {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1beta/models/:call", post(handle))
        .with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}/v1beta", addr), calls))
}

#[tokio::test]
async fn generate_posts_to_generate_content_with_key_header() -> anyhow::Result<()> {
    let (base_url, calls) = spawn_stub().await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let request = GenerateRequest {
        model: "gemini-2.5-flash".to_string(),
        prompt: "Extract the world".to_string(),
        response: ResponseFormat::Json {
            schema: json!({"type": "OBJECT"}),
        },
    };
    let response = client.generate(&request).await?;

    assert_eq!(response.text(), "{\"characters\": [], \"scenes\": []}");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        calls[0].body["contents"][0]["parts"][0]["text"],
        "Extract the world"
    );
    assert_eq!(
        calls[0].body["generationConfig"]["responseMimeType"],
        "application/json"
    );
    Ok(())
}

#[tokio::test]
async fn inline_image_is_decoded() -> anyhow::Result<()> {
    let (base_url, _) = spawn_stub().await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let request = GenerateRequest {
        model: "gemini-2.5-flash-image".to_string(),
        prompt: "A lighthouse".to_string(),
        response: ResponseFormat::Image { aspect_ratio: None },
    };
    let response = client.generate(&request).await?;

    assert_eq!(
        response.first(),
        Some(&Output::Image {
            mime: Some("image/png".to_string()),
            data: b"png".to_vec()
        })
    );
    Ok(())
}

#[tokio::test]
async fn generate_images_uses_predict() -> anyhow::Result<()> {
    let (base_url, calls) = spawn_stub().await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let request = ImageRequestBuilder::default()
        .model("imagen-4.0-generate-001")
        .prompt("A lighthouse")
        .build()?;
    let images = client.generate_images(&request).await?;

    assert_eq!(images, vec![b"jpeg".to_vec()]);
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].call, "imagen-4.0-generate-001:predict");
    assert_eq!(calls[0].body["parameters"]["sampleCount"], 1);
    Ok(())
}

#[tokio::test]
async fn service_unavailable_is_retryable() -> anyhow::Result<()> {
    let (base_url, _) = spawn_stub().await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let err = client
        .generate(&GenerateRequest::text("overloaded", "hi"))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("UNAVAILABLE: The model is overloaded"));
    Ok(())
}

#[tokio::test]
async fn bad_request_is_permanent() -> anyhow::Result<()> {
    let (base_url, _) = spawn_stub().await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let err = client
        .generate(&GenerateRequest::text("no-such-model", "hi"))
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    match err.kind() {
        StoryboardErrorKind::Gemini(e) => assert_eq!(e.kind.status_code(), Some(400)),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_a_transient_transport_error() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = GeminiClient::with_api_key("test-key", format!("http://{}/v1beta", addr))?;
    let err = client
        .generate(&GenerateRequest::text("gemini-2.5-flash", "hi"))
        .await
        .unwrap_err();

    match err.kind() {
        StoryboardErrorKind::Gemini(e) => assert!(matches!(e.kind, GeminiErrorKind::Transport(_))),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_retryable());
    Ok(())
}

/// Read one request, headers and declared body, off the socket.
async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let Ok(n) = socket.read(&mut buf).await else {
            return;
        };
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&request);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.trim()
                        .eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return;
            }
        }
    }
}

/// Answer a single connection with `response`, then close it.
async fn serve_raw(response: &'static [u8]) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request(&mut socket).await;
        let _ = socket.write_all(response).await;
        let _ = socket.shutdown().await;
    });
    Ok(format!("http://{}/v1beta", addr))
}

#[tokio::test]
async fn body_cut_off_mid_read_is_a_transient_transport_error() -> anyhow::Result<()> {
    let base_url = serve_raw(
        b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\n\r\n{\"candidates\":[",
    )
    .await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let err = client
        .generate(&GenerateRequest::text("gemini-2.5-flash", "hi"))
        .await
        .unwrap_err();

    match err.kind() {
        StoryboardErrorKind::Gemini(e) => assert!(
            matches!(e.kind, GeminiErrorKind::Transport(_)),
            "unexpected kind: {}",
            e.kind
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn complete_but_malformed_body_is_permanent() -> anyhow::Result<()> {
    let base_url = serve_raw(
        b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 8\r\n\r\nnot json",
    )
    .await?;
    let client = GeminiClient::with_api_key("test-key", base_url)?;

    let err = client
        .generate(&GenerateRequest::text("gemini-2.5-flash", "hi"))
        .await
        .unwrap_err();

    match err.kind() {
        StoryboardErrorKind::Gemini(e) => {
            assert!(matches!(e.kind, GeminiErrorKind::InvalidResponse(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_retryable());
    Ok(())
}

#[test]
fn blank_key_is_rejected_before_any_request() {
    let err = GeminiClient::with_api_key("  ", "http://127.0.0.1:9").unwrap_err();
    assert!(err.is_credential_missing());
}

#[test]
fn override_beats_environment_lookup() {
    let env = |name: &str| match name {
        "GEMINI_API_KEY" => Some("gemini-env".to_string()),
        "API_KEY" => Some("generic-env".to_string()),
        _ => None,
    };

    assert_eq!(resolve_api_key_from(Some("explicit"), env).unwrap(), "explicit");
    assert_eq!(resolve_api_key_from(None, env).unwrap(), "gemini-env");
    assert_eq!(
        resolve_api_key_from(None, |name: &str| (name == "API_KEY")
            .then(|| "generic-env".to_string()))
        .unwrap(),
        "generic-env"
    );
}

#[test]
fn missing_key_is_credential_error() {
    let err = resolve_api_key_from(Some(""), |_: &str| Some("   ".to_string())).unwrap_err();
    assert!(err.is_credential_missing());
    assert!(!err.is_retryable());
}
