use super::*;
use crate::llm::tools::recommend_tool;
use crate::llm::types::StopReason;

fn body(parts: serde_json::Value, finish_reason: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": finish_reason
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 30 },
        "modelVersion": "gemini-3-flash-preview"
    })
    .to_string()
}

#[test]
fn function_call_becomes_tool_call() {
    let json = body(
        serde_json::json!([{
            "functionCall": {
                "name": "recommend_setting",
                "args": { "recommendedMode": "制冷", "recommendedTemp": 26, "explanation": "睡眠时适宜" }
            }
        }]),
        "STOP",
    );
    let reply = parse_response(&json).unwrap();
    assert_eq!(reply.stop, StopReason::ToolUse);
    assert_eq!(reply.model, "gemini-3-flash-preview");
    assert_eq!(reply.usage.input_tokens, 120);
    assert_eq!(reply.usage.output_tokens, 30);
    assert_eq!(reply.arguments_for("recommend_setting").unwrap()["recommendedTemp"], 26);
}

#[test]
fn text_reply_and_thoughts() {
    let json = body(
        serde_json::json!([
            { "text": "thinking out loud", "thought": true },
            { "text": "answer" }
        ]),
        "STOP",
    );
    let reply = parse_response(&json).unwrap();
    assert_eq!(reply.text, "answer");
    assert_eq!(reply.stop, StopReason::EndTurn);
}

#[test]
fn max_tokens_finish_is_truncation() {
    let json = body(serde_json::json!([{ "text": "part" }]), "MAX_TOKENS");
    assert_eq!(parse_response(&json).unwrap().stop, StopReason::MaxTokens);
}

#[test]
fn blocked_prompt_names_reason() {
    let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    assert!(matches!(parse_response(&json), Err(LlmError::ApiParse(msg)) if msg.contains("SAFETY")));
    assert!(matches!(parse_response("<html>"), Err(LlmError::ApiParse(_))));
}

#[test]
fn request_restricts_calling_to_the_tool() {
    let tool = recommend_tool();
    let prompt = ToolPrompt { system: "system text", user: "我想睡觉了", tool: &tool, max_tokens: 512 };
    let json = serde_json::to_value(build_request(&prompt)).unwrap();
    assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system text");
    assert!(json["systemInstruction"].get("role").is_none());
    assert_eq!(json["contents"][0]["role"], "user");
    assert_eq!(json["contents"][0]["parts"][0]["text"], "我想睡觉了");
    assert_eq!(json["tools"][0]["functionDeclarations"][0]["name"], "recommend_setting");
    assert_eq!(
        json["toolConfig"]["functionCallingConfig"],
        serde_json::json!({ "mode": "ANY", "allowedFunctionNames": ["recommend_setting"] })
    );
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
}

#[test]
fn blank_system_prompt_is_omitted() {
    let tool = recommend_tool();
    let prompt = ToolPrompt { system: "", user: "hi", tool: &tool, max_tokens: 64 };
    let json = serde_json::to_value(build_request(&prompt)).unwrap();
    assert!(json.get("systemInstruction").is_none());
}
