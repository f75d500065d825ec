//! Gemini `generateContent` adapter.

use super::{GenerativeClient, PromptRequest, ProviderError};
use crate::config::Config;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini REST client issuing single-turn `generateContent` calls.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl GeminiClient {
    /// Build a client against `base_url` using `default_model` when requests name no model.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!("notecraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| {
                ProviderError::Unavailable(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            default_model: default_model.into(),
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        )
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        let block_reason = self
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ProviderError::EmptyResponse(block_reason));
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::EmptyResponse(
                block_reason.or(candidate.finish_reason),
            ));
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: PromptRequest) -> Result<String, ProviderError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let mut parts = vec![Part::Text {
            text: &request.prompt,
        }];
        if let Some(attachment) = request.attachment.as_ref() {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: &attachment.mime_type,
                    data: STANDARD.encode(&attachment.data),
                },
            });
        }
        let payload = GenerateContentRequest {
            contents: [Content { role: "user", parts }],
        };

        tracing::debug!(
            model,
            prompt_chars = request.prompt.chars().count(),
            attachment_bytes = request.attachment.as_ref().map(|a| a.data.len()),
            "Calling Gemini generateContent"
        );

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ProviderError::Unavailable(format!(
                    "failed to reach Gemini at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(ProviderError::GenerationFailed(format!(
                "Gemini returned {status}: {message}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            ProviderError::InvalidResponse(format!("failed to decode Gemini response: {error}"))
        })?;
        body.into_text()
    }
}
