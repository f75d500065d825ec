//! Gateway to the external generative-content provider.
//!
//! Every prompt the backend issues goes through [`GenerativeClient`]. The production adapter
//! talks to the Gemini REST API; tests swap in fakes that record prompts and return canned
//! text. Clients are built once at start-up and passed into the service explicitly.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Upper bound on the amount of source text embedded in a single prompt.
pub const MAX_SOURCE_CHARS: usize = 15_000;

/// Errors surfaced by generative providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider could not be reached.
    #[error("Generative provider unavailable: {0}")]
    Unavailable(String),
    /// Provider answered with an error status.
    #[error("Failed to generate content: {0}")]
    GenerationFailed(String),
    /// Provider response could not be decoded.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Provider answered without any text, typically because the prompt was blocked.
    #[error("Provider returned no text{}", .0.as_deref().map(|reason| format!(" ({reason})")).unwrap_or_default())]
    EmptyResponse(Option<String>),
}

/// Binary payload sent next to the prompt text (vision requests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// MIME type understood by the provider, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Raw bytes; adapters handle any transport encoding.
    pub data: Vec<u8>,
}

/// A single prompt, optionally bundled with an attachment. Built per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Model override; the client's default model is used when `None`.
    pub model: Option<String>,
    /// Fully assembled prompt text.
    pub prompt: String,
    /// Optional binary attachment.
    pub attachment: Option<Attachment>,
}

impl PromptRequest {
    /// Text-only prompt against the default model.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            attachment: None,
        }
    }

    /// Prompt with a binary attachment against the default model.
    pub fn with_attachment(prompt: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            attachment: Some(attachment),
        }
    }

    /// Route this prompt to a specific model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Interface implemented by generative-content providers.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send the prompt and return the provider's text, trimmed of surrounding whitespace.
    async fn generate(&self, request: PromptRequest) -> Result<String, ProviderError>;
}

/// Truncate `text` to at most [`MAX_SOURCE_CHARS`] characters without splitting a character.
pub fn truncate_source(text: &str) -> &str {
    truncate_chars(text, MAX_SOURCE_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_short_text_intact() {
        assert_eq!(truncate_source("short"), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_SOURCE_CHARS + 10);
        let truncated = truncate_source(&text);
        assert_eq!(truncated.chars().count(), MAX_SOURCE_CHARS);
        assert_eq!(truncate_chars("ab•cd", 3), "ab•");
    }

    #[test]
    fn empty_response_message_includes_reason() {
        let error = ProviderError::EmptyResponse(Some("SAFETY".into()));
        assert_eq!(error.to_string(), "Provider returned no text (SAFETY)");
        assert_eq!(
            ProviderError::EmptyResponse(None).to_string(),
            "Provider returned no text"
        );
    }
}
