//! LLM types: the single-turn, forced-tool exchange every provider speaks.
//!
//! A [`ToolPrompt`] is one system prompt, one user turn and exactly one tool
//! the model must call. Providers answer with a [`Reply`] holding the tool
//! calls they made plus any text they emitted alongside.

use std::fmt;

use serde_json::Value;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM config: {0}")]
    ConfigParse(String),

    #[error("LLM credential not found: env var {var} is unset")]
    MissingApiKey { var: String },

    /// Transport-level failure: DNS, TLS, connection reset, timeout.
    #[error("LLM request failed: {0}")]
    ApiRequest(String),

    #[error("LLM provider answered HTTP {status}")]
    ApiResponse { status: u16, body: String },

    #[error("LLM reply unreadable: {0}")]
    ApiParse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Whether an identical request could succeed later. Logged only; the
    /// caller never retries on its own.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::ApiRequest(_) => true,
            Self::ApiResponse { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A function the model is offered, described by a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// One forced-tool completion request.
#[derive(Debug, Clone, Copy)]
pub struct ToolPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub tool: &'a ToolSpec,
    pub max_tokens: u32,
}

// =============================================================================
// REPLY
// =============================================================================

/// Why generation stopped, normalized across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    EndTurn,
    ToolUse,
    MaxTokens,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EndTurn => "end_turn",
            Self::ToolUse => "tool_use",
            Self::MaxTokens => "max_tokens",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub arguments: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    pub model: String,
    pub calls: Vec<ToolCall>,
    /// Text parts joined with newlines; empty when the model only called tools.
    pub text: String,
    pub stop: StopReason,
    pub usage: Usage,
}

impl Reply {
    /// Arguments of the first call to `name`.
    #[must_use]
    pub fn arguments_for(&self, name: &str) -> Option<&Value> {
        self.calls.iter().find(|c| c.name == name).map(|c| &c.arguments)
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
    }

    pub(crate) fn push_call(&mut self, name: &str, arguments: Value) {
        self.calls.push(ToolCall { name: name.to_string(), arguments });
    }

    /// Settle `stop`: a tool call wins over truncation.
    pub(crate) fn finish(mut self, truncated: bool) -> Self {
        self.stop = if !self.calls.is_empty() {
            StopReason::ToolUse
        } else if truncated {
            StopReason::MaxTokens
        } else {
            StopReason::EndTurn
        };
        self
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Provider-neutral seam; tests substitute scripted replies.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the reply is unreadable.
    async fn complete(&self, prompt: &ToolPrompt<'_>) -> Result<Reply, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
