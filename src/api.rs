//! HTTP surface for NoteCraft.
//!
//! - `GET /` – Liveness text.
//! - `POST /upload` – Multipart `file` (PDF). Returns `{ filename, summary, questions }`.
//! - `POST /api/voice/upload` – Multipart `audio`. Returns `{ transcript, summary, images }`.
//! - `POST /convert-handwriting` – JSON `{ image_base64 }` data URI. Returns `{ text }`; failures
//!   use a `{ detail }` body.
//! - `POST /api/chat` – JSON `{ prompt }`. Returns `{ reply }`.
//!
//! Every route allows any origin. Handlers only validate input and translate [`StudyError`]
//! into status codes; the work happens in [`StudyService`].

use crate::service::{
    ChatReply, DocumentDigest, HandwritingText, StudyError, StudyService, UploadedFile,
    VoiceDigest,
};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Banner returned by `GET /`.
pub const BANNER: &str = "SMNS AI Note Craft Backend is running.";

/// Build the HTTP router. `body_limit` caps request bodies in bytes.
pub fn create_router(service: Arc<StudyService>, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_document))
        .route("/api/voice/upload", post(upload_voice))
        .route("/convert-handwriting", post(convert_handwriting))
        .route("/api/chat", post(chat))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(service)
}

async fn index() -> &'static str {
    BANNER
}

/// Summarize an uploaded PDF and extract study questions.
async fn upload_document(
    State(service): State<Arc<StudyService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentDigest>, AppError> {
    let upload = read_file_field(multipart, "file").await?;
    tracing::info!(filename = %upload.filename, bytes = upload.bytes.len(), "PDF upload received");
    let digest = service
        .summarize_document(upload)
        .await
        .map_err(|error| AppError::logged("Upload processing error", error))?;
    Ok(Json(digest))
}

/// Store a voice recording and return its transcript, summary, and keyword images.
async fn upload_voice(
    State(service): State<Arc<StudyService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VoiceDigest>, AppError> {
    let upload = read_file_field(multipart, "audio").await?;
    tracing::info!(filename = %upload.filename, bytes = upload.bytes.len(), "Voice upload received");
    let digest = service
        .process_voice(upload)
        .await
        .map_err(|error| AppError::logged("Voice processing error", error))?;
    Ok(Json(digest))
}

#[derive(Deserialize)]
struct HandwritingRequest {
    /// Data URI (`data:image/png;base64,...`) of the drawn canvas.
    image_base64: String,
}

/// Convert a handwriting image into text.
async fn convert_handwriting(
    State(service): State<Arc<StudyService>>,
    payload: Result<Json<HandwritingRequest>, JsonRejection>,
) -> Result<Json<HandwritingText>, DetailError> {
    let Json(request) = payload
        .map_err(|rejection| DetailError(StudyError::InvalidRequest(rejection.body_text())))?;
    let text = service
        .convert_handwriting(&request.image_base64)
        .await
        .map_err(|error| {
            tracing::error!(error = %error, "Handwriting conversion error");
            DetailError(error)
        })?;
    Ok(Json(text))
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    prompt: String,
}

/// Answer a free-form study prompt.
async fn chat(
    State(service): State<Arc<StudyService>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError(StudyError::InvalidRequest(rejection.body_text())))?;
    let reply = service
        .chat(&request.prompt)
        .await
        .map_err(|error| AppError::logged("Chat error", error))?;
    Ok(Json(reply))
}

/// Pull the named file field out of a multipart body; other fields are skipped.
async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
    field_name: &'static str,
) -> Result<UploadedFile, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::warn!(error = %rejection, field = field_name, "Rejected non-multipart upload");
        AppError(StudyError::MissingInput(field_name))
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError(StudyError::InvalidRequest(error.body_text())))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        // Plain form values with the right name are not uploads.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|error| AppError(StudyError::InvalidRequest(error.body_text())))?;
        return Ok(UploadedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError(StudyError::MissingInput(field_name)))
}

fn status_for(error: &StudyError) -> StatusCode {
    match error {
        StudyError::MissingInput(_) | StudyError::EmptyPrompt | StudyError::InvalidRequest(_) => {
            StatusCode::BAD_REQUEST
        }
        StudyError::ExtractionFailed
        | StudyError::Image(_)
        | StudyError::Provider(_)
        | StudyError::Storage(_)
        | StudyError::Transcription(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Failure rendered as `{ "error": message }`.
struct AppError(StudyError);

impl AppError {
    fn logged(context: &'static str, error: StudyError) -> Self {
        tracing::error!(error = %error, "{context}");
        Self(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            status_for(&self.0),
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Failure rendered as `{ "detail": message }`.
struct DetailError(StudyError);

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        (
            status_for(&self.0),
            Json(json!({ "detail": self.0.to_string() })),
        )
            .into_response()
    }
}
