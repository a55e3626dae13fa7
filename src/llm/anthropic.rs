//! Anthropic Messages API client.
//!
//! The prompt becomes one user message and `tool_choice` pins the model to
//! the prompt's tool by name.

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::types::{LlmError, Reply, ToolPrompt};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        Ok(Self { http: super::http_client(timeouts)?, api_key })
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, non-200 status, or an unreadable body.
    pub async fn complete(&self, model: &str, prompt: &ToolPrompt<'_>) -> Result<Reply, LlmError> {
        let request = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);
        let text = super::send_json(request, &build_request(model, prompt)).await?;
        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
    tools: [ToolDef<'a>; 1],
    tool_choice: ForcedTool<'a>,
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ToolDef<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Serialize)]
struct ForcedTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

fn build_request<'a>(model: &'a str, prompt: &ToolPrompt<'a>) -> MessagesRequest<'a> {
    let tool = prompt.tool;
    MessagesRequest {
        model,
        max_tokens: prompt.max_tokens,
        system: prompt.system,
        messages: [UserTurn { role: "user", content: prompt.user }],
        tools: [ToolDef { name: tool.name, description: tool.description, input_schema: &tool.parameters }],
        tool_choice: ForcedTool { kind: "tool", name: tool.name },
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Keeps `text` and `tool_use` blocks; thinking and server-side blocks are dropped.
fn parse_response(body: &str) -> Result<Reply, LlmError> {
    let root = super::parse_json(body)?;
    let blocks = root
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::ApiParse("anthropic: missing content".into()))?;

    let mut reply = Reply {
        model: super::str_at(&root, "/model").to_string(),
        usage: super::usage_at(&root, "/usage/input_tokens", "/usage/output_tokens"),
        ..Reply::default()
    };
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => reply.push_text(super::str_at(block, "/text")),
            Some("tool_use") => {
                let name = super::str_at(block, "/name");
                if !name.is_empty() {
                    reply.push_call(name, block.get("input").cloned().unwrap_or(Value::Null));
                }
            }
            _ => {}
        }
    }
    Ok(reply.finish(super::str_at(&root, "/stop_reason") == "max_tokens"))
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
