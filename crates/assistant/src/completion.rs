//! Completion endpoint client.
//!
//! Sends composed prompts to an OpenAI-compatible chat-completions endpoint.
//! The client is total: a missing credential short-circuits to a fixed
//! fallback sentence without any network call, and any transport, HTTP, or
//! parse failure degrades to a fixed apology string.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::CompletionConfig;
use crate::models::Product;

/// Per-call timeout for completion requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling temperature for all completion requests.
const TEMPERATURE: f32 = 0.7;

/// Maximum output length for an assistant answer.
const MAX_ANSWER_TOKENS: u32 = 500;

/// Maximum output length for a generated product description.
const MAX_DESCRIPTION_TOKENS: u32 = 300;

const SYSTEM_PROMPT: &str = "You are a helpful e-commerce assistant that provides detailed product information and answers questions about our store.";

const DESCRIPTION_SYSTEM_PROMPT: &str =
    "You are a helpful e-commerce assistant that provides detailed product descriptions.";

/// Fixed reply when no completion credential is configured.
pub const MISSING_CREDENTIAL_REPLY: &str = "I'm sorry, but I need an OpenAI API key to provide detailed product information. Please add your API key to the .env file.";

/// Fixed reply when the completion endpoint fails in any way.
pub const APOLOGY_REPLY: &str = "I'm sorry, but I encountered an error while processing your request. Please try again later.";

/// Errors that can occur when calling the completion endpoint.
///
/// These never cross the client boundary: the public methods convert them
/// to fixed reply text and log them.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response carried no completion choices.
    #[error("response contained no choices")]
    EmptyResponse,
}

/// Completion endpoint client.
///
/// Constructed from an explicit [`CompletionConfig`]; passing `None` builds
/// a disabled client that answers with fallback text and never touches the
/// network. Credentials are injected here rather than read from ambient
/// state so tests can substitute both the key and the endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    inner: Option<Inner>,
}

#[derive(Clone)]
struct Inner {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl CompletionClient {
    /// Create a new completion client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: Option<&CompletionConfig>) -> Self {
        let inner = config.map(|config| {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

            let bearer = format!("Bearer {}", config.api_key.expose_secret());
            let mut auth_value =
                HeaderValue::from_str(&bearer).expect("Invalid API key for header");
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);

            let client = reqwest::Client::builder()
                .default_headers(headers)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client");

            Inner {
                client,
                api_url: config.api_url.clone(),
                model: config.model.clone(),
            }
        });

        Self { inner }
    }

    /// Whether a credential is configured.
    ///
    /// A disabled client answers every request with fallback text without
    /// issuing a network call.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Answer a composed prompt.
    ///
    /// One outbound request per invocation (zero when disabled); no retry.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: &str) -> String {
        let Some(inner) = &self.inner else {
            return MISSING_CREDENTIAL_REPLY.to_string();
        };

        match inner.chat(SYSTEM_PROMPT, prompt, MAX_ANSWER_TOKENS).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "completion request failed");
                APOLOGY_REPLY.to_string()
            }
        }
    }

    /// Generate a marketing description for a single product.
    ///
    /// When disabled, or on any failure, falls back to a deterministic
    /// rendering of the catalog data.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn describe_product(&self, product: &Product) -> String {
        let Some(inner) = &self.inner else {
            return description_fallback(product);
        };

        let prompt = description_prompt(product);
        match inner
            .chat(DESCRIPTION_SYSTEM_PROMPT, &prompt, MAX_DESCRIPTION_TOKENS)
            .await
        {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "description request failed");
                description_fallback(product)
            }
        }
    }
}

impl Inner {
    async fn chat(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

/// Deterministic description used when the endpoint is unavailable.
fn description_fallback(product: &Product) -> String {
    format!(
        "This is {}, priced at ${}. {}",
        product.name, product.price, product.description
    )
}

/// Build the user turn for a product-description request.
fn description_prompt(product: &Product) -> String {
    let category = product
        .category
        .as_ref()
        .map_or("Not specified", |c| c.name.as_str());

    format!(
        "Please provide a detailed and engaging description for the following product:\n\
         Name: {name}\n\
         Price: ${price}\n\
         Category: {category}\n\
         Current description: {description}\n\n\
         Make the description informative, highlight key features, and include potential use cases.",
        name = product.name,
        price = product.price,
        category = category,
        description = product.description,
    )
}

/// A chat message in the completion request.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat-completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}
