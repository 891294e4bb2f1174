//! Google Generative Language client with thought-signature support
//!
//! Translates a provider-agnostic conversation (text, tool calls, tool
//! results, reasoning) into the `generateContent` wire format, sends it, and
//! maps the response back. Opaque thought signatures issued on tool calls are
//! carried through so multi-turn tool calling keeps working on models that
//! require them.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod capability;
pub mod client;
pub mod convert;
pub mod error;
pub mod protocol;
pub mod types;

pub use capability::{CapabilityRule, CapabilityTable, ModelCapabilities, is_gemini3_model};
pub use client::GeminiClient;
pub use error::LlmError;
pub use types::{
    CallOptions, ContentChoice, ContentPart, ContentResponse, FunctionCall, Message, Role, ToolCall, ToolDefinition,
};
