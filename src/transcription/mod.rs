//! Audio transcription seam.
//!
//! No speech-to-text backend is wired in yet. [`PlaceholderTranscriber`] returns a fixed
//! transcript so the voice pipeline can run end to end; swap in a real [`Transcriber`] when
//! one is available.

use async_trait::async_trait;
use thiserror::Error;

/// Transcript returned by [`PlaceholderTranscriber`] for every upload.
pub const PLACEHOLDER_TRANSCRIPT: &str =
    "Today we will discuss cell biology... mitochondria generates ATP...";

/// Errors raised by transcription backends.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// Backend could not produce a transcript for the supplied audio.
    #[error("Failed to transcribe audio: {0}")]
    Failed(String),
}

/// Uploaded audio handed to a transcriber.
#[derive(Debug, Clone, Copy)]
pub struct AudioInput<'a> {
    /// Client-supplied filename.
    pub filename: &'a str,
    /// Declared content type, when the client sent one.
    pub content_type: Option<&'a str>,
    /// Raw audio bytes.
    pub bytes: &'a [u8],
}

/// Interface implemented by speech-to-text backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Produce a transcript for the supplied audio.
    async fn transcribe(&self, audio: AudioInput<'_>) -> Result<String, TranscriptionError>;
}

/// Stand-in transcriber returning [`PLACEHOLDER_TRANSCRIPT`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderTranscriber;

#[async_trait]
impl Transcriber for PlaceholderTranscriber {
    async fn transcribe(&self, audio: AudioInput<'_>) -> Result<String, TranscriptionError> {
        tracing::debug!(
            filename = audio.filename,
            bytes = audio.bytes.len(),
            "Using placeholder transcript"
        );
        Ok(PLACEHOLDER_TRANSCRIPT.to_string())
    }
}
