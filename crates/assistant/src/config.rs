//! Assistant configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPMATE_BACKEND_URL` - Base URL of the product/order backend API
//!
//! ## Optional
//! - `OPENAI_API_KEY` - Completion endpoint API key; when absent, empty, or
//!   a recognizable placeholder, the assistant answers with fixed fallback
//!   text and never calls the completion endpoint
//! - `OPENAI_MODEL` - Completion model ID (default: gpt-4o-mini)
//! - `OPENAI_API_URL` - Completion endpoint URL (default: the OpenAI
//!   chat-completions endpoint; override to point tests at a mock server)

use secrecy::SecretString;
use thiserror::Error;
use tracing::warn;

const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_COMPLETION_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Assistant application configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Backend product/order API configuration
    pub backend: BackendConfig,
    /// Completion endpoint configuration; `None` means no usable credential
    /// is configured and the assistant runs in fallback mode
    pub completion: Option<CompletionConfig>,
}

/// Backend product/order API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API (e.g., <https://api.example.com/api>)
    pub base_url: String,
}

/// Completion endpoint configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Completion endpoint API key
    pub api_key: SecretString,
    /// Completion endpoint URL
    pub api_url: String,
    /// Model ID sent with each request
    pub model: String,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    /// A missing or placeholder completion credential is not an error: it
    /// selects the no-call fallback path.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = BackendConfig::from_env()?;
        let completion = CompletionConfig::from_env();

        Ok(Self {
            backend,
            completion,
        })
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("SHOPMATE_BACKEND_URL")?;
        validate_base_url("SHOPMATE_BACKEND_URL", &base_url)?;
        Ok(Self { base_url })
    }
}

impl CompletionConfig {
    /// Build the completion configuration, or `None` when no usable
    /// credential is set.
    fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        Self::from_parts(
            &api_key,
            get_env_or_default("OPENAI_API_URL", DEFAULT_COMPLETION_API_URL),
            get_env_or_default("OPENAI_MODEL", DEFAULT_COMPLETION_MODEL),
        )
    }

    fn from_parts(api_key: &str, api_url: String, model: String) -> Option<Self> {
        if api_key.is_empty() {
            warn!("OPENAI_API_KEY is empty; assistant will answer with fallback text");
            return None;
        }
        if is_placeholder(api_key) {
            warn!("OPENAI_API_KEY looks like a placeholder; assistant will answer with fallback text");
            return None;
        }

        Some(Self {
            api_key: SecretString::from(api_key.to_string()),
            api_url,
            model,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a base URL is an absolute http(s) URL.
fn validate_base_url(var_name: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected an absolute http(s) URL, got {value:?}"),
        ))
    }
}

/// Check if a value matches common placeholder patterns.
fn is_placeholder(value: &str) -> bool {
    let lowered = value.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}
