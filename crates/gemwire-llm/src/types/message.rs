use serde::{Deserialize, Serialize};

use super::response::ContentChoice;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    #[serde(alias = "human")]
    User,
    /// Model response
    #[serde(alias = "ai")]
    Assistant,
    /// Tool/function results
    Tool,
}

/// Message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Ordered content parts
    pub parts: Vec<ContentPart>,
}

impl Message {
    /// Create a message from its parts
    pub const fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Single-text system instruction
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentPart::text(text)])
    }

    /// Single-text user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// Tool message carrying the results of one model turn
    pub fn tool_results(responses: impl IntoIterator<Item = ToolCallResponse>) -> Self {
        Self::new(Role::Tool, responses.into_iter().map(ContentPart::ToolCallResponse).collect())
    }

    /// Assistant turn to append to history after receiving `choice`
    ///
    /// Holds the choice text (when non-empty) followed by every tool call
    /// with its thought signature. Reasoning text is left out since the
    /// provider rejects it on replay.
    pub fn from_choice(choice: &ContentChoice) -> Self {
        let mut parts = Vec::with_capacity(choice.tool_calls.len() + 1);
        if !choice.content.is_empty() {
            parts.push(ContentPart::text(choice.content.clone()));
        }
        parts.extend(choice.tool_calls.iter().cloned().map(ContentPart::ToolCall));
        Self::new(Role::Assistant, parts)
    }

    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Individual part within a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text(TextContent),
    /// Tool call requested by the model
    ToolCall(ToolCall),
    /// Result of executing a tool call
    ToolCallResponse(ToolCallResponse),
    /// Model reasoning, never sent back to the provider
    Thinking(ThinkingContent),
}

impl ContentPart {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextContent { text: text.into() })
    }

    /// Reasoning part with an optional signature
    pub fn thinking(thinking: impl Into<String>, signature: Option<String>) -> Self {
        Self::Thinking(ThinkingContent {
            thinking: thinking.into(),
            signature,
        })
    }
}

impl From<ToolCall> for ContentPart {
    fn from(call: ToolCall) -> Self {
        Self::ToolCall(call)
    }
}

impl From<ToolCallResponse> for ContentPart {
    fn from(response: ToolCallResponse) -> Self {
        Self::ToolCallResponse(response)
    }
}

/// Plain text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text string
    pub text: String,
}

/// A tool/function call requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier for this tool call
    pub id: String,
    /// Function name and arguments
    pub function: FunctionCall,
    /// Opaque provider token, echoed back verbatim on replay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl ToolCall {
    /// Build a tool call without a signature
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
            thought_signature: None,
        }
    }

    /// Attach a thought signature
    #[must_use]
    pub fn with_thought_signature(mut self, signature: impl Into<String>) -> Self {
        self.thought_signature = Some(signature.into());
        self
    }
}

/// Function name and arguments within a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

/// Result of a tool invocation
///
/// The provider matches results to calls by function name, so no call id
/// is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResponse {
    /// Name of the function that produced this result
    pub name: String,
    /// Output content from the tool
    pub content: String,
}

impl ToolCallResponse {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Model reasoning text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingContent {
    /// Reasoning text
    pub thinking: String,
    /// Opaque verification token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
