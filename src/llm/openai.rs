//! OpenAI-compatible client for `/chat/completions` and `/responses`.
//!
//! Both endpoints get the same single-turn prompt; only the envelope differs.
//! Tool arguments come back as a JSON string and are decoded here.

use serde::Serialize;
use serde_json::Value;

use super::config::{LlmTimeouts, OpenAiApiMode};
use super::types::{LlmError, Reply, ToolPrompt};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, mode: OpenAiApiMode, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        Ok(Self { http: super::http_client(timeouts)?, api_key, base_url, mode })
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, non-200 status, or an unreadable body.
    pub async fn complete(&self, model: &str, prompt: &ToolPrompt<'_>) -> Result<Reply, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let text = self.post("/chat/completions", &chat_request(model, prompt)).await?;
                parse_chat_completions(&text)
            }
            OpenAiApiMode::Responses => {
                let text = self.post("/responses", &responses_request(model, prompt)).await?;
                parse_responses(&text)
            }
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key);
        super::send_json(request, body).await
    }
}

// =============================================================================
// CHAT COMPLETIONS
// =============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatTurn<'a>>,
    tools: [ChatTool<'a>; 1],
    tool_choice: ChatToolChoice<'a>,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDef<'a>,
}

#[derive(Serialize)]
struct FunctionDef<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Serialize)]
struct ChatToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionName<'a>,
}

#[derive(Serialize)]
struct FunctionName<'a> {
    name: &'a str,
}

fn chat_request<'a>(model: &'a str, prompt: &ToolPrompt<'a>) -> ChatRequest<'a> {
    let tool = prompt.tool;
    let mut messages = Vec::with_capacity(2);
    if !prompt.system.trim().is_empty() {
        messages.push(ChatTurn { role: "system", content: prompt.system });
    }
    messages.push(ChatTurn { role: "user", content: prompt.user });

    ChatRequest {
        model,
        max_tokens: prompt.max_tokens,
        messages,
        tools: [ChatTool {
            kind: "function",
            function: FunctionDef { name: tool.name, description: tool.description, parameters: &tool.parameters },
        }],
        tool_choice: ChatToolChoice { kind: "function", function: FunctionName { name: tool.name } },
    }
}

pub(crate) fn parse_chat_completions(body: &str) -> Result<Reply, LlmError> {
    let root = super::parse_json(body)?;
    let message = root
        .pointer("/choices/0/message")
        .ok_or_else(|| LlmError::ApiParse("chat_completions: missing choices[0].message".into()))?;

    let mut reply = Reply {
        model: super::str_at(&root, "/model").to_string(),
        usage: super::usage_at(&root, "/usage/prompt_tokens", "/usage/completion_tokens"),
        ..Reply::default()
    };
    reply.push_text(super::str_at(message, "/content"));
    for call in message.get("tool_calls").and_then(Value::as_array).into_iter().flatten() {
        let name = super::str_at(call, "/function/name");
        if !name.is_empty() {
            reply.push_call(name, decode_arguments(super::str_at(call, "/function/arguments"))?);
        }
    }
    Ok(reply.finish(super::str_at(&root, "/choices/0/finish_reason") == "length"))
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a str,
    tools: [ResponsesTool<'a>; 1],
    tool_choice: ResponsesToolChoice<'a>,
}

#[derive(Serialize)]
struct ResponsesTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    function: FunctionDef<'a>,
}

#[derive(Serialize)]
struct ResponsesToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

fn responses_request<'a>(model: &'a str, prompt: &ToolPrompt<'a>) -> ResponsesRequest<'a> {
    let tool = prompt.tool;
    ResponsesRequest {
        model,
        max_output_tokens: prompt.max_tokens,
        instructions: prompt.system,
        input: prompt.user,
        tools: [ResponsesTool {
            kind: "function",
            function: FunctionDef { name: tool.name, description: tool.description, parameters: &tool.parameters },
        }],
        tool_choice: ResponsesToolChoice { kind: "function", name: tool.name },
    }
}

pub(crate) fn parse_responses(body: &str) -> Result<Reply, LlmError> {
    let root = super::parse_json(body)?;
    let mut reply = Reply {
        model: super::str_at(&root, "/model").to_string(),
        usage: super::usage_at(&root, "/usage/input_tokens", "/usage/output_tokens"),
        ..Reply::default()
    };

    match root.get("output").and_then(Value::as_array) {
        Some(items) => {
            for item in items {
                match super::str_at(item, "/type") {
                    "message" => {
                        for part in item.get("content").and_then(Value::as_array).into_iter().flatten() {
                            if matches!(super::str_at(part, "/type"), "output_text" | "text") {
                                reply.push_text(super::str_at(part, "/text"));
                            }
                        }
                    }
                    "function_call" => {
                        let name = super::str_at(item, "/name");
                        if !name.is_empty() {
                            reply.push_call(name, decode_arguments(super::str_at(item, "/arguments"))?);
                        }
                    }
                    _ => {}
                }
            }
        }
        None => reply.push_text(super::str_at(&root, "/output_text")),
    }

    let truncated = super::str_at(&root, "/incomplete_details/reason") == "max_output_tokens";
    Ok(reply.finish(truncated))
}

/// Tool arguments arrive as a JSON document inside a string; empty means `{}`.
fn decode_arguments(raw: &str) -> Result<Value, LlmError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|e| LlmError::ApiParse(format!("tool arguments are not JSON: {e}")))
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
