//! Conversion between internal types and Google Generative Language wire format

use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::protocol::google::{
    GoogleCandidate, GoogleContent, GoogleFunctionCall, GoogleFunctionCallingConfig, GoogleFunctionDeclaration,
    GoogleFunctionResponse, GoogleGenerationConfig, GooglePart, GoogleRequest, GoogleResponse, GoogleThinkingConfig,
    GoogleTool, GoogleToolConfig, GoogleUsageMetadata,
};
use crate::types::{
    COMPLETION_TOKENS, CallOptions, ContentChoice, ContentPart, ContentResponse, FunctionCall, Message,
    PROMPT_TOKENS, Role, THINKING_CONTENT, THINKING_TOKENS, THOUGHT_SIGNATURE, TOTAL_TOKENS, ToolCall, ToolChoice,
    ToolDefinition,
};

/// Role tag used inside `systemInstruction`
const SYSTEM_INSTRUCTION_ROLE: &str = "user";

/// Key wrapping tool output inside `functionResponse.response`
const FUNCTION_RESPONSE_KEY: &str = "response";

// -- Outbound: internal request -> Google wire request --

/// Build the `generateContent` request for a conversation
///
/// System messages are lifted into `systemInstruction`; every other message
/// keeps its position. Reasoning parts are never sent back.
///
/// # Errors
///
/// Returns `LlmError::InvalidRequest` if a tool call carries arguments that
/// are not a JSON object.
pub fn build_request(messages: &[Message], options: &CallOptions) -> Result<GoogleRequest, LlmError> {
    let mut system_parts = Vec::new();
    let mut contents = Vec::with_capacity(messages.len());

    for msg in messages {
        let role = match msg.role {
            Role::System => {
                system_parts.extend(msg.parts.iter().filter_map(|part| match part {
                    ContentPart::Text(t) => Some(GooglePart::text(t.text.clone())),
                    _ => None,
                }));
                continue;
            }
            // Tool results are folded into a user turn
            Role::User | Role::Tool => "user",
            Role::Assistant => "model",
        };

        let parts = msg
            .parts
            .iter()
            .filter_map(|part| internal_part_to_google(part).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        if !parts.is_empty() {
            contents.push(GoogleContent {
                role: Some(role.to_owned()),
                parts,
            });
        }
    }

    let system_instruction = (!system_parts.is_empty()).then(|| GoogleContent {
        role: Some(SYSTEM_INSTRUCTION_ROLE.to_owned()),
        parts: system_parts,
    });

    let generation_config = Some(generation_config(options)).filter(|c| !c.is_empty());

    Ok(GoogleRequest {
        contents,
        system_instruction,
        generation_config,
        tools: function_declarations(&options.tools),
        tool_config: options.tool_choice.as_ref().map(tool_config),
    })
}

/// Convert one content part, `None` for parts the provider does not accept back
fn internal_part_to_google(part: &ContentPart) -> Result<Option<GooglePart>, LlmError> {
    let converted = match part {
        ContentPart::Text(t) => GooglePart::text(t.text.clone()),
        ContentPart::ToolCall(call) => GooglePart::FunctionCall {
            function_call: GoogleFunctionCall {
                name: call.function.name.clone(),
                args: decode_arguments(call)?,
            },
            thought_signature: call.thought_signature.clone(),
        },
        ContentPart::ToolCallResponse(resp) => {
            let mut response = Map::new();
            response.insert(FUNCTION_RESPONSE_KEY.to_owned(), Value::String(resp.content.clone()));
            GooglePart::FunctionResponse {
                function_response: GoogleFunctionResponse {
                    name: resp.name.clone(),
                    response: Value::Object(response),
                },
            }
        }
        ContentPart::Thinking(_) => return Ok(None),
    };

    Ok(Some(converted))
}

/// Decode a tool call's JSON argument string into an object
fn decode_arguments(call: &ToolCall) -> Result<Map<String, Value>, LlmError> {
    let raw = call.function.arguments.trim();
    if raw.is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str(raw) {
        Ok(Value::Object(args)) => Ok(args),
        Ok(other) => Err(LlmError::InvalidRequest(format!(
            "arguments for tool call `{}` ({}) must be a JSON object, got {other}",
            call.function.name, call.id
        ))),
        Err(e) => Err(LlmError::InvalidRequest(format!(
            "arguments for tool call `{}` ({}) are not valid JSON: {e}",
            call.function.name, call.id
        ))),
    }
}

fn generation_config(options: &CallOptions) -> GoogleGenerationConfig {
    GoogleGenerationConfig {
        temperature: options.temperature.filter(|v| v.abs() > f64::EPSILON),
        top_p: options.top_p.filter(|v| v.abs() > f64::EPSILON),
        top_k: options.top_k.filter(|&v| v > 0),
        max_output_tokens: options.max_tokens.filter(|&v| v > 0),
        stop_sequences: (!options.stop_words.is_empty()).then(|| options.stop_words.clone()),
        candidate_count: options.candidate_count.filter(|&v| v > 0),
        thinking_config: options.thinking.map(|t| GoogleThinkingConfig {
            include_thoughts: t.include_thoughts.then_some(true),
            thinking_budget: t.budget_tokens,
        }),
    }
}

fn function_declarations(tools: &[ToolDefinition]) -> Option<Vec<GoogleTool>> {
    let declarations: Vec<_> = tools
        .iter()
        .filter(|t| t.tool_type == "function")
        .map(|t| GoogleFunctionDeclaration {
            name: t.function.name.clone(),
            description: t.function.description.clone(),
            parameters: t.function.parameters.clone(),
        })
        .collect();

    (!declarations.is_empty()).then(|| {
        vec![GoogleTool {
            function_declarations: declarations,
        }]
    })
}

fn tool_config(choice: &ToolChoice) -> GoogleToolConfig {
    let (mode, allowed_function_names) = match choice {
        ToolChoice::Auto => ("AUTO", None),
        ToolChoice::None => ("NONE", None),
        ToolChoice::Required => ("ANY", None),
        ToolChoice::Function { name } => ("ANY", Some(vec![name.clone()])),
    };

    GoogleToolConfig {
        function_calling_config: GoogleFunctionCallingConfig {
            mode: mode.to_owned(),
            allowed_function_names,
        },
    }
}

// -- Inbound: Google wire response -> internal types --

impl From<GoogleResponse> for ContentResponse {
    fn from(resp: GoogleResponse) -> Self {
        let usage = resp.usage_metadata;
        let choices = resp
            .candidates
            .into_iter()
            .map(|candidate| google_candidate_to_choice(candidate, usage.as_ref()))
            .collect();

        Self { choices }
    }
}

/// Convert a Google candidate to a choice
///
/// Usage is reported once per response, so every choice gets the same counters.
fn google_candidate_to_choice(candidate: GoogleCandidate, usage: Option<&GoogleUsageMetadata>) -> ContentChoice {
    let mut choice = ContentChoice {
        stop_reason: candidate.finish_reason.unwrap_or_default(),
        ..ContentChoice::default()
    };

    if let Some(usage) = usage {
        let info = &mut choice.generation_info;
        info.insert(PROMPT_TOKENS.to_owned(), usage.prompt_token_count.into());
        info.insert(COMPLETION_TOKENS.to_owned(), usage.candidates_token_count.into());
        info.insert(TOTAL_TOKENS.to_owned(), usage.total_token_count.into());
        if let Some(thoughts) = usage.thoughts_token_count {
            info.insert(THINKING_TOKENS.to_owned(), thoughts.into());
        }
    }

    let mut thinking = String::new();
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    for part in parts {
        match part {
            GooglePart::Text {
                text,
                thought: true,
                thought_signature,
            } => {
                thinking.push_str(&text);
                if thought_signature.is_some() {
                    choice.thought_signature = thought_signature;
                }
            }
            GooglePart::Text {
                text,
                thought_signature,
                ..
            } => {
                choice.content.push_str(&text);
                if thought_signature.is_some() {
                    choice.thought_signature = thought_signature;
                }
            }
            GooglePart::FunctionCall {
                function_call,
                thought_signature,
            } => {
                let arguments = serde_json::to_string(&function_call.args).unwrap_or_else(|_| "{}".to_owned());
                if thought_signature.is_some() {
                    choice.thought_signature.clone_from(&thought_signature);
                }
                choice.tool_calls.push(ToolCall {
                    id: format!("call_{}", choice.tool_calls.len()),
                    function: FunctionCall {
                        name: function_call.name,
                        arguments,
                    },
                    thought_signature,
                });
            }
            GooglePart::Other { thought_signature } => {
                if thought_signature.is_some() {
                    choice.thought_signature = thought_signature;
                }
            }
            GooglePart::FunctionResponse { .. } => {}
        }
    }

    if !thinking.is_empty() {
        choice
            .generation_info
            .insert(THINKING_CONTENT.to_owned(), Value::String(thinking.clone()));
        choice.thinking_content = Some(thinking);
    }

    if let Some(signature) = &choice.thought_signature {
        choice
            .generation_info
            .insert(THOUGHT_SIGNATURE.to_owned(), Value::String(signature.clone()));
    }

    choice.func_call = choice.tool_calls.first().map(|call| call.function.clone());

    choice
}
