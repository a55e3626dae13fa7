//! Google Gemini `generateContent` client.
//!
//! Function calling is set to `ANY` with the prompt's tool as the only
//! allowed name. Thought-summary parts are skipped.

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::types::{LlmError, Reply, ToolPrompt};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        Ok(Self { http: super::http_client(timeouts)?, api_key, base_url })
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, non-200 status, or an unreadable body.
    pub async fn complete(&self, model: &str, prompt: &ToolPrompt<'_>) -> Result<Reply, LlmError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let request = self.http.post(url).header("x-goog-api-key", &self.api_key);
        let text = super::send_json(request, &build_request(prompt)).await?;
        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: [Content<'a>; 1],
    tools: [FunctionDeclarations<'a>; 1],
    tool_config: ToolConfig<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionDeclarations<'a> {
    function_declarations: [Declaration<'a>; 1],
}

#[derive(Serialize)]
struct Declaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig<'a> {
    function_calling_config: CallingConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CallingConfig<'a> {
    mode: &'static str,
    allowed_function_names: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

fn build_request<'a>(prompt: &ToolPrompt<'a>) -> GenerateRequest<'a> {
    let tool = prompt.tool;
    let system_instruction = (!prompt.system.trim().is_empty())
        .then(|| Content { role: None, parts: [TextPart { text: prompt.system }] });

    GenerateRequest {
        system_instruction,
        contents: [Content { role: Some("user"), parts: [TextPart { text: prompt.user }] }],
        tools: [FunctionDeclarations {
            function_declarations: [Declaration {
                name: tool.name,
                description: tool.description,
                parameters: &tool.parameters,
            }],
        }],
        tool_config: ToolConfig {
            function_calling_config: CallingConfig { mode: "ANY", allowed_function_names: [tool.name] },
        },
        generation_config: GenerationConfig { max_output_tokens: prompt.max_tokens },
    }
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_response(body: &str) -> Result<Reply, LlmError> {
    let root = super::parse_json(body)?;
    let Some(candidate) = root.pointer("/candidates/0") else {
        let reason = match super::str_at(&root, "/promptFeedback/blockReason") {
            "" => "no candidates",
            blocked => blocked,
        };
        return Err(LlmError::ApiParse(format!("gemini: empty reply ({reason})")));
    };

    let mut reply = Reply {
        model: super::str_at(&root, "/modelVersion").to_string(),
        usage: super::usage_at(&root, "/usageMetadata/promptTokenCount", "/usageMetadata/candidatesTokenCount"),
        ..Reply::default()
    };
    let parts = candidate.pointer("/content/parts").and_then(Value::as_array);
    for part in parts.into_iter().flatten() {
        if part.get("thought").and_then(Value::as_bool) == Some(true) {
            continue;
        }
        if let Some(call) = part.get("functionCall") {
            let name = super::str_at(call, "/name");
            if !name.is_empty() {
                let args = call.get("args").cloned().unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                reply.push_call(name, args);
            }
        } else {
            reply.push_text(super::str_at(part, "/text"));
        }
    }
    Ok(reply.finish(super::str_at(candidate, "/finishReason") == "MAX_TOKENS"))
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
