//! HTTP contract tests, driven through the router without a socket.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use docsum::config::Config;
use docsum::fs_store::FsArtifactStore;
use docsum::pipeline::Pipeline;
use docsum::server::build_router;
use docsum_core::summarize::TruncationSummarizer;

const BOUNDARY: &str = "docsum-test-boundary";

fn setup() -> (TempDir, Router) {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.output_dir = tmp.path().join("output");
    config.server.max_upload_bytes = 64 * 1024;

    let store = Arc::new(FsArtifactStore::from_config(&config));
    let pipeline = Pipeline::new(Arc::new(TruncationSummarizer::default()), store);
    (tmp, build_router(&config, pipeline))
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn upload(app: &Router, filename: &str, content: &[u8]) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(upload_request(multipart_body(filename, content)))
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn upload_txt_returns_summary_and_artifact() {
    let (tmp, app) = setup();
    let (status, body) = upload(&app, "ciao.txt", b"Hello world").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"], "Hello world");
    assert_eq!(body["original_filename"], "ciao.txt");
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("riassunto_"));
    assert!(tmp.path().join("output").join(filename).is_file());
}

#[tokio::test]
async fn upload_pdf_returns_extracted_text() {
    let (_tmp, app) = setup();
    let (status, body) = upload(&app, "hello.pdf", &common::single_page_pdf("Hello world")).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["summary"], "Hello world");
}

#[tokio::test]
async fn upload_pdf_without_text_is_extraction_error() {
    let (tmp, app) = setup();
    let (status, body) = upload(&app, "vuoto.pdf", &common::multi_page_pdf(&[""])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "extraction_error");
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn upload_over_size_limit_is_payload_too_large() {
    let (tmp, app) = setup();
    let oversized = vec![b'a'; 128 * 1024];
    let (status, body) = upload(&app, "grande.txt", &oversized).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "payload_too_large");
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn upload_docx_is_unsupported_format() {
    let (tmp, app) = setup();
    let (status, body) = upload(&app, "notes.docx", b"PK\x03\x04").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unsupported_format");
    assert!(!body["error"]["message"].as_str().unwrap().is_empty());
    assert!(!tmp.path().join("output").exists());
}

#[tokio::test]
async fn upload_empty_txt_is_empty_content() {
    let (_tmp, app) = setup();
    let (status, body) = upload(&app, "vuoto.txt", b"").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "empty_content");
}

#[tokio::test]
async fn upload_invalid_utf8_is_decoding_error() {
    let (_tmp, app) = setup();
    let (status, body) = upload(&app, "latin1.txt", &[b'c', b'a', b'f', 0xe8]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "decoding_error");
}

#[tokio::test]
async fn upload_corrupt_pdf_is_extraction_error() {
    let (_tmp, app) = setup();
    let (status, body) = upload(&app, "rotto.pdf", b"not a pdf at all").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "extraction_error");
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let (_tmp, app) = setup();
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\n");
    body.extend_from_slice(b"nessun file");
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let response = app.oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn download_returns_stored_bytes_as_attachment() {
    let (_tmp, app) = setup();
    let (_, body) = upload(&app, "ciao.txt", "Ciao è così".as_bytes()).await;
    let filename = body["filename"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get_request(&format!("/download/{}", filename)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}\"", filename).as_str()
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], "Ciao è così".as_bytes());
}

#[tokio::test]
async fn download_missing_artifact_is_404() {
    let (_tmp, app) = setup();
    let response = app
        .oneshot(get_request("/download/riassunto_19990101_000000.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn download_traversal_is_rejected() {
    let (tmp, app) = setup();
    std::fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();

    for uri in ["/download/..%2Fsecret.txt", "/download/.hidden", "/download/..%5Csecret.txt"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "invalid_name", "{}", uri);
    }
}

#[tokio::test]
async fn index_page_has_upload_form() {
    let (_tmp, app) = setup();
    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/upload"));
}

#[tokio::test]
async fn health_reports_version() {
    let (_tmp, app) = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
