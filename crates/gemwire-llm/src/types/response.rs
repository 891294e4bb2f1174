use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::message::{FunctionCall, ToolCall};

/// `generation_info` key for prompt token count
pub const PROMPT_TOKENS: &str = "PromptTokens";
/// `generation_info` key for generated token count
pub const COMPLETION_TOKENS: &str = "CompletionTokens";
/// `generation_info` key for total token count
pub const TOTAL_TOKENS: &str = "TotalTokens";
/// `generation_info` key for reasoning token count
pub const THINKING_TOKENS: &str = "ThinkingTokens";
/// `generation_info` key duplicating [`ContentChoice::thinking_content`]
pub const THINKING_CONTENT: &str = "ThinkingContent";
/// `generation_info` key duplicating [`ContentChoice::thought_signature`]
pub const THOUGHT_SIGNATURE: &str = "ThoughtSignature";

/// Response to a `generate_content` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentResponse {
    /// One choice per provider candidate, in order
    pub choices: Vec<ContentChoice>,
}

/// A single generated candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentChoice {
    /// Concatenated text output
    pub content: String,
    /// Provider finish reason (e.g. "STOP", "MAX_TOKENS")
    pub stop_reason: String,
    /// Tool calls requested by the model, in order
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// First tool call's function, kept for older callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func_call: Option<FunctionCall>,
    /// Reasoning text returned with the candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_content: Option<String>,
    /// Last thought signature seen in the candidate
    ///
    /// Each tool call keeps its own signature; this field only holds the
    /// most recent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    /// Auxiliary fields: token counts and duplicated reasoning fields
    #[serde(default)]
    pub generation_info: BTreeMap<String, serde_json::Value>,
}

impl ContentChoice {
    /// Token usage recorded in `generation_info`
    pub fn usage(&self) -> Option<Usage> {
        let count = |key: &str| {
            self.generation_info
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
        };

        Some(Usage {
            prompt_tokens: count(PROMPT_TOKENS)?,
            completion_tokens: count(COMPLETION_TOKENS)?,
            total_tokens: count(TOTAL_TOKENS)?,
            thinking_tokens: count(THINKING_TOKENS),
        })
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated across candidates
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
    /// Tokens spent on reasoning, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_tokens: Option<u32>,
}
