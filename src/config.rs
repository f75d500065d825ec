use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default Gemini model used for every prompt unless overridden.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Directory receiving uploaded audio files.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// Request body ceiling applied to every route (25 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the NoteCraft backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key sent to the Gemini API.
    pub gemini_api_key: String,
    /// Model used for questions, keywords, handwriting, and chat.
    pub gemini_model: String,
    /// Model used for document summaries.
    pub gemini_summary_model: String,
    /// Base URL of the Gemini REST API.
    pub gemini_base_url: String,
    /// Directory where uploaded audio files are written.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_model =
            load_env_optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_summary_model: load_env_optional("GEMINI_SUMMARY_MODEL")
                .unwrap_or_else(|| gemini_model.clone()),
            gemini_model,
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            upload_dir: load_env_optional("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into())
                .into(),
            max_upload_bytes: load_env_optional("MAX_UPLOAD_BYTES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("MAX_UPLOAD_BYTES".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// The first successful call wins; later calls return the cached value.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        model = %config.gemini_model,
        summary_model = %config.gemini_summary_model,
        base_url = %config.gemini_base_url,
        upload_dir = %config.upload_dir.display(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
