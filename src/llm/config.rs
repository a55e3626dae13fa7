//! LLM configuration read from environment variables.
//!
//! Parsing goes through a lookup function so it can be exercised without
//! touching the process environment.

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProviderKind {
    #[default]
    Gemini,
    Anthropic,
    OpenAi,
}

impl LlmProviderKind {
    fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-3-flash-preview",
            Self::Anthropic => "claude-sonnet-4-5-20250929",
            Self::OpenAi => "gpt-4o",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAiApiMode {
    ChatCompletions,
    #[default]
    Responses,
}

/// Optional HTTP timeouts; `None` keeps reqwest's default of no timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LlmTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
    pub openai_mode: OpenAiApiMode,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Read the config from the process environment.
    ///
    /// - `LLM_API_KEY_ENV` (required): name of the variable holding the key
    /// - `LLM_PROVIDER`: `gemini` (default), `anthropic` or `openai`
    /// - `LLM_MODEL`: provider default when absent
    /// - `LLM_OPENAI_MODE`: `responses` (default) or `chat_completions`
    /// - `LLM_OPENAI_BASE_URL`, `LLM_GEMINI_BASE_URL`: endpoint overrides
    /// - `LLM_REQUEST_TIMEOUT_SECS`, `LLM_CONNECT_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or a value does not parse.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with `lookup` standing in for the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let provider = match lookup("LLM_PROVIDER").as_deref().map(str::trim) {
            None | Some("" | "gemini") => LlmProviderKind::Gemini,
            Some("anthropic") => LlmProviderKind::Anthropic,
            Some("openai") => LlmProviderKind::OpenAi,
            Some(other) => return Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER '{other}'"))),
        };

        let key_var = lookup("LLM_API_KEY_ENV").ok_or_else(|| LlmError::MissingApiKey { var: "LLM_API_KEY_ENV".into() })?;
        let api_key = lookup(&key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: key_var.clone() })?;

        let openai_mode = match lookup("LLM_OPENAI_MODE").as_deref().map(str::trim) {
            None | Some("" | "responses") => OpenAiApiMode::Responses,
            Some("chat_completions") => OpenAiApiMode::ChatCompletions,
            Some(other) => {
                return Err(LlmError::ConfigParse(format!(
                    "LLM_OPENAI_MODE '{other}' (expected 'responses' or 'chat_completions')"
                )));
            }
        };

        let base_url = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string()).trim_end_matches('/').to_string()
        };
        let seconds = |key: &str| -> Result<Option<u64>, LlmError> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| LlmError::ConfigParse(format!("{key} must be whole seconds, got '{raw}'")))
                })
                .transpose()
        };

        Ok(Self {
            provider,
            api_key,
            model: lookup("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            openai_mode,
            openai_base_url: base_url("LLM_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            gemini_base_url: base_url("LLM_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            timeouts: LlmTimeouts {
                request_secs: seconds("LLM_REQUEST_TIMEOUT_SECS")?,
                connect_secs: seconds("LLM_CONNECT_TIMEOUT_SECS")?,
            },
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
