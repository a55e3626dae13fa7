//! The one tool the recommender forces the model to call.
//!
//! Its parameter schema is the suggestion shape, so every provider returns
//! structured arguments rather than prose.

use super::types::ToolSpec;
use crate::state::{AcMode, MAX_TEMPERATURE, MIN_TEMPERATURE};

pub const RECOMMEND_TOOL: &str = "recommend_setting";

/// `recommend_setting`: a mode label, a setpoint and a short rationale.
#[must_use]
pub fn recommend_tool() -> ToolSpec {
    let modes: Vec<&str> = AcMode::ALL.iter().map(|m| m.label()).collect();
    ToolSpec {
        name: RECOMMEND_TOOL,
        description: "Report the recommended air-conditioner mode and temperature for the user's request.",
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "recommendedMode": {
                    "type": "string",
                    "enum": modes,
                    "description": "推荐的模式"
                },
                "recommendedTemp": {
                    "type": "number",
                    "minimum": MIN_TEMPERATURE,
                    "maximum": MAX_TEMPERATURE,
                    "description": "推荐的温度"
                },
                "explanation": { "type": "string", "description": "推荐理由，简洁有力" }
            },
            "required": ["recommendedMode", "recommendedTemp", "explanation"]
        }),
    }
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
