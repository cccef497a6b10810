//! HTTP server for uploads and summary downloads.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Landing page with the upload form |
//! | `POST` | `/upload` | Multipart upload of one `.txt` or `.pdf` file |
//! | `GET`  | `/download/{filename}` | Stored summary as `text/plain` attachment |
//! | `GET`  | `/static/*` | Files under `[server].static_dir` |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "success": false, "error": { "code": "unsupported_format", "message": "..." } }
//! ```
//!
//! Error codes: `unsupported_format`, `decoding_error`, `extraction_error`,
//! `empty_content`, `summarization_unavailable`, `bad_request`,
//! `invalid_name` (400), `not_found` (404), `payload_too_large` (413),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the upload form can be
//! hosted elsewhere.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use docsum_core::models::{SummaryResult, UploadedDocument};
use docsum_core::store::StoreError;

use crate::config::Config;
use crate::pipeline::{IngestError, Pipeline};

/// Landing page compiled into the binary, served when `index_path` is missing.
const EMBEDDED_INDEX: &str = include_str!("../templates/index.html");

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    pipeline: Pipeline,
    index_path: Arc<PathBuf>,
}

/// Starts the HTTP server on `[server].bind` and runs until Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    let app = build_router(config, pipeline);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(
        bind = %config.server.bind,
        output_dir = %config.storage.output_dir.display(),
        summarizer = %config.summarizer.provider,
        "docsum server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Builds the router around an existing pipeline.
///
/// Split from [`run_server`] so tests can drive the app without a socket.
pub fn build_router(config: &Config, pipeline: Pipeline) -> Router {
    let state = AppState {
        pipeline,
        index_path: Arc::new(config.server.index_path.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .route("/download/{filename}", get(handle_download))
        .route("/health", get(handle_health))
        .nest_service("/static", ServeDir::new(&config.server.static_dir))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::new(StatusCode::BAD_REQUEST, "bad_request", message)
}

/// Upload body errors keep the status axum picked; an exceeded
/// `max_upload_bytes` becomes `413 payload_too_large`.
fn multipart_error(err: MultipartError) -> AppError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(
            status,
            "payload_too_large",
            "Il file supera la dimensione massima consentita",
        )
    } else {
        AppError::new(status, "bad_request", err.body_text())
    }
}

fn internal_error() -> AppError {
    AppError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "Errore interno del server",
    )
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let message = match &err {
            IngestError::UnsupportedFormat { .. } => {
                "Formato file non supportato. Utilizzare file .pdf o .txt".to_string()
            }
            IngestError::Decoding(detail) => {
                format!("Errore nella lettura del file TXT: {}", detail)
            }
            IngestError::Extraction(detail) => {
                format!("Errore nell'estrazione del testo dal PDF: {}", detail)
            }
            IngestError::EmptyContent => "Il file non contiene testo leggibile".to_string(),
            IngestError::SummarizationUnavailable(e) => {
                format!("Servizio di riassunto non disponibile: {}", e)
            }
            IngestError::Storage(e) => {
                error!(error = %e, "failed to store summary");
                return internal_error();
            }
        };
        AppError::new(StatusCode::BAD_REQUEST, err.code(), message)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => {
                AppError::new(StatusCode::NOT_FOUND, "not_found", "File non trovato")
            }
            StoreError::InvalidName { reason, .. } => AppError::new(
                StatusCode::BAD_REQUEST,
                "invalid_name",
                format!("Nome file non valido: {}", reason),
            ),
            other => {
                error!(error = %other, "failed to read artifact");
                internal_error()
            }
        }
    }
}

// ============ GET / ============

/// Serves `[server].index_path`, or the embedded page if it cannot be read.
async fn handle_index(State(state): State<AppState>) -> Html<String> {
    match tokio::fs::read_to_string(state.index_path.as_ref()).await {
        Ok(content) => Html(content),
        Err(_) => Html(EMBEDDED_INDEX.to_string()),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /upload ============

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    #[serde(flatten)]
    result: SummaryResult,
}

/// Handler for `POST /upload`.
///
/// Takes the first multipart field that carries a filename and runs it
/// through the pipeline. Returns `400` for classified rejections and `500`
/// when the summary cannot be stored.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let doc = read_upload(&mut multipart).await?;
    let result = state.pipeline.process(doc).await?;
    Ok(Json(UploadResponse {
        success: true,
        result,
    }))
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedDocument::new(filename, bytes.to_vec()));
    }
    Err(bad_request("Nessun file caricato"))
}

// ============ GET /download/{filename} ============

/// Handler for `GET /download/{filename}`.
///
/// Name validation happens inside the store; this handler only shapes the
/// response.
async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.pipeline.store().retrieve(&filename).await?;
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
