//! LLM: one forced-tool completion against Gemini, Anthropic or `OpenAI`.
//!
//! DESIGN
//! ======
//! `config` reads the provider choice and credentials from the environment.
//! `LlmClient` holds the selected provider and implements the provider-neutral
//! `LlmChat` trait, so the recommender and its tests never name a concrete
//! provider. Providers serialize typed request structs and read replies
//! through JSON pointers, tolerating fields they do not know.

pub mod anthropic;
pub mod config;
pub mod gemini;
pub mod openai;
pub mod tools;
pub mod types;

use std::time::Duration;

use serde_json::Value;

use config::{LlmConfig, LlmProviderKind, LlmTimeouts};
pub use types::LlmChat;
use types::{LlmError, Reply, ToolPrompt, Usage};

// =============================================================================
// SHARED TRANSPORT
// =============================================================================

/// Build the reqwest client. Timeouts are applied only when configured.
pub(crate) fn http_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeouts.request_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = timeouts.connect_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| LlmError::HttpClientBuild(e.to_string()))
}

/// POST `body` as JSON; any status other than 200 is an error carrying the body.
pub(crate) async fn send_json(request: reqwest::RequestBuilder, body: &impl serde::Serialize) -> Result<String, LlmError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
    if status != 200 {
        return Err(LlmError::ApiResponse { status, body: text });
    }
    Ok(text)
}

// =============================================================================
// SHARED PARSING
// =============================================================================

pub(crate) fn parse_json(body: &str) -> Result<Value, LlmError> {
    serde_json::from_str(body).map_err(|e| LlmError::ApiParse(e.to_string()))
}

/// String at a JSON pointer, or `""` when absent or not a string.
pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> &'a str {
    value.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn usage_at(root: &Value, input: &str, output: &str) -> Usage {
    let count = |pointer: &str| root.pointer(pointer).and_then(Value::as_u64).unwrap_or(0);
    Usage { input_tokens: count(input), output_tokens: count(output) }
}

// =============================================================================
// CLIENT
// =============================================================================

/// The configured provider plus the model name sent with every request.
pub struct LlmClient {
    provider: Provider,
    model: String,
}

enum Provider {
    Gemini(gemini::GeminiClient),
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build a client from the process environment. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid, or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let LlmConfig { provider, api_key, model, openai_mode, openai_base_url, gemini_base_url, timeouts } = config;
        let provider = match provider {
            LlmProviderKind::Gemini => Provider::Gemini(gemini::GeminiClient::new(api_key, gemini_base_url, timeouts)?),
            LlmProviderKind::Anthropic => Provider::Anthropic(anthropic::AnthropicClient::new(api_key, timeouts)?),
            LlmProviderKind::OpenAi => {
                Provider::OpenAi(openai::OpenAiClient::new(api_key, openai_mode, openai_base_url, timeouts)?)
            }
        };
        Ok(Self { provider, model })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn complete(&self, prompt: &ToolPrompt<'_>) -> Result<Reply, LlmError> {
        match &self.provider {
            Provider::Gemini(c) => c.complete(&self.model, prompt).await,
            Provider::Anthropic(c) => c.complete(&self.model, prompt).await,
            Provider::OpenAi(c) => c.complete(&self.model, prompt).await,
        }
    }
}
