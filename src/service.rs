//! Study service coordinating extraction, provider calls, and normalization.
//!
//! One method per public operation. Each returns an explicit `Result`; translating failures
//! into HTTP responses is left to [`crate::api`].

use crate::{
    extraction::{ImageError, extract_pdf_text, prepare_handwriting_image},
    normalize::{KeywordImage, QuestionRecord, keyword_images, parse_keywords, wrap_questions},
    provider::{GenerativeClient, PromptRequest, ProviderError, truncate_source},
    storage::UploadStore,
    transcription::{AudioInput, Transcriber, TranscriptionError},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

const SUMMARY_PROMPT: &str =
    "Summarize the following academic content in a clear and concise way:\n\n";
const HANDWRITING_PROMPT: &str =
    "Extract the handwritten text from this image. Output only the exact text you see.";

/// Errors emitted by the study pipeline.
#[derive(Debug, Error)]
pub enum StudyError {
    /// A required input field was absent.
    #[error("No {0} uploaded")]
    MissingInput(&'static str),
    /// A chat prompt was blank.
    #[error("Prompt must not be empty")]
    EmptyPrompt,
    /// The request body could not be parsed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The uploaded document produced no text.
    #[error("Failed to extract text from PDF")]
    ExtractionFailed,
    /// The handwriting image could not be decoded or re-encoded.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// The generative provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The upload could not be written to disk.
    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
    /// The transcriber failed.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Uploaded file handed to the pipeline.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared content type, when present.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Result of summarizing an uploaded PDF.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDigest {
    /// Client-supplied filename.
    pub filename: String,
    /// Provider summary of the extracted text.
    pub summary: String,
    /// Questions extracted from the text.
    pub questions: Vec<QuestionRecord>,
}

/// Result of processing an uploaded voice recording.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceDigest {
    /// Transcript produced by the transcriber.
    pub transcript: String,
    /// Provider summary of the transcript.
    pub summary: String,
    /// One placeholder image per extracted keyword.
    pub images: Vec<KeywordImage>,
}

/// Text recognized in a handwriting image.
#[derive(Debug, Clone, Serialize)]
pub struct HandwritingText {
    /// Recognized text.
    pub text: String,
}

/// Reply to a free-form chat prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// Provider answer.
    pub reply: String,
}

/// Shared handle bundling the collaborators each request needs.
///
/// Built once at start-up and shared through an `Arc`; it holds no per-request state.
pub struct StudyService {
    provider: Arc<dyn GenerativeClient>,
    transcriber: Arc<dyn Transcriber>,
    uploads: UploadStore,
    summary_model: Option<String>,
}

impl StudyService {
    /// Build a service from its collaborators.
    pub fn new(
        provider: Arc<dyn GenerativeClient>,
        transcriber: Arc<dyn Transcriber>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            provider,
            transcriber,
            uploads,
            summary_model: None,
        }
    }

    /// Route document summaries to a dedicated model.
    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summary_model = Some(model.into());
        self
    }

    /// Extract text from a PDF, then summarize it and pull out study questions.
    pub async fn summarize_document(
        &self,
        upload: UploadedFile,
    ) -> Result<DocumentDigest, StudyError> {
        let UploadedFile {
            filename, bytes, ..
        } = upload;
        let text = extract_pdf_text(bytes).await;
        if text.trim().is_empty() {
            return Err(StudyError::ExtractionFailed);
        }
        let source = truncate_source(&text);

        let mut summary_request = PromptRequest::text(format!("{SUMMARY_PROMPT}{source}"));
        if let Some(model) = self.summary_model.as_deref() {
            summary_request = summary_request.model(model);
        }
        let summary = self.provider.generate(summary_request).await?;

        let raw_questions = self
            .provider
            .generate(PromptRequest::text(format!(
                "Extract all possible academic questions from the following content.\n\n\
                 Format them as a plain list like:\n- What is XYZ?\n- How does ABC work?\n\n\
                 Content:\n{source}\n"
            )))
            .await?;
        let questions = wrap_questions(&raw_questions);

        tracing::info!(
            filename = %filename,
            text_chars = text.chars().count(),
            questions = questions.len(),
            "Document processed"
        );
        Ok(DocumentDigest {
            filename,
            summary,
            questions,
        })
    }

    /// Store a voice recording, transcribe it, and derive a summary plus keyword images.
    pub async fn process_voice(&self, upload: UploadedFile) -> Result<VoiceDigest, StudyError> {
        let path = self.uploads.save(&upload.filename, &upload.bytes).await?;
        let transcript = self
            .transcriber
            .transcribe(AudioInput {
                filename: &upload.filename,
                content_type: upload.content_type.as_deref(),
                bytes: &upload.bytes,
            })
            .await?;
        let source = truncate_source(&transcript);

        let summary = self
            .provider
            .generate(PromptRequest::text(format!(
                "Summarize the following:\n\n{source}"
            )))
            .await?;
        let raw_keywords = self
            .provider
            .generate(PromptRequest::text(format!(
                "From this content, give 3-5 educational keywords:\n\n{source}"
            )))
            .await?;
        let keywords = parse_keywords(&raw_keywords);

        tracing::info!(
            path = %path.display(),
            keywords = keywords.len(),
            "Voice upload processed"
        );
        Ok(VoiceDigest {
            transcript,
            summary,
            images: keyword_images(&keywords),
        })
    }

    /// Recognize handwritten text in a base64 data-URI image.
    pub async fn convert_handwriting(
        &self,
        image_base64: &str,
    ) -> Result<HandwritingText, StudyError> {
        let attachment = prepare_handwriting_image(image_base64).await?;
        let text = self
            .provider
            .generate(PromptRequest::with_attachment(HANDWRITING_PROMPT, attachment))
            .await?;
        tracing::info!(chars = text.chars().count(), "Handwriting converted");
        Ok(HandwritingText { text })
    }

    /// Forward a free-form prompt to the provider.
    pub async fn chat(&self, prompt: &str) -> Result<ChatReply, StudyError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StudyError::EmptyPrompt);
        }
        let reply = self
            .provider
            .generate(PromptRequest::text(truncate_source(prompt)))
            .await?;
        Ok(ChatReply { reply })
    }
}
