//! Provider-agnostic conversation types
//!
//! Callers build conversations and read responses through these types only;
//! the wire representation lives in [`crate::protocol`].

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{ContentPart, FunctionCall, Message, Role, TextContent, ThinkingContent, ToolCall, ToolCallResponse};
pub use request::{CallOptions, ThinkingOptions};
pub use response::{
    COMPLETION_TOKENS, ContentChoice, ContentResponse, PROMPT_TOKENS, THINKING_CONTENT, THINKING_TOKENS,
    THOUGHT_SIGNATURE, TOTAL_TOKENS, Usage,
};
pub use tool::{FunctionDefinition, ToolChoice, ToolDefinition};
