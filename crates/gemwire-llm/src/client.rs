//! Google Generative Language API client

use gemwire_config::ProviderConfig;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::capability::{CapabilityTable, ModelCapabilities};
use crate::convert::google::build_request;
use crate::error::LlmError;
use crate::protocol::google::{GoogleErrorResponse, GoogleResponse};
use crate::types::{CallOptions, ContentPart, ContentResponse, Message, Role};

/// Default Google Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the `generateContent` endpoint
///
/// Each call is a single stateless request; the client can be cloned and
/// shared freely.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    capabilities: CapabilityTable,
}

impl GeminiClient {
    /// Create a client for the public endpoint
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default URL"),
            api_key: api_key.into(),
            capabilities: CapabilityTable::builtin(),
        }
    }

    /// Create from provider configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidRequest` if no API key is configured or a
    /// capability pattern does not compile.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LlmError::InvalidRequest("no API key configured".to_owned()))?;

        let capabilities = CapabilityTable::from_config(&config.capabilities)
            .map_err(|e| LlmError::InvalidRequest(format!("invalid capability pattern: {e}")))?;

        let mut client = Self::new(api_key).with_capabilities(capabilities);
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url.clone());
        }

        Ok(client)
    }

    /// Point the client at another endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Use a preconfigured HTTP client (proxies, timeouts, TLS)
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Replace the capability table
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: CapabilityTable) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Base URL requests are sent to
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Capabilities of `model` according to this client's table
    pub fn capabilities(&self, model: &str) -> ModelCapabilities {
        self.capabilities.lookup(model)
    }

    /// Build the `generateContent` endpoint URL for a model
    ///
    /// The API key is attached separately so the URL is safe to log.
    fn generate_url(&self, model: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{base}/models/{model}:generateContent")
    }

    /// Generate content for a conversation
    ///
    /// Sends exactly one request; there is no retry. Dropping the returned
    /// future aborts the request.
    ///
    /// # Errors
    ///
    /// - `LlmError::InvalidRequest` if the conversation cannot be translated
    /// - `LlmError::Upstream` if the provider answers with a non-success status
    /// - `LlmError::Transport` if the request fails on the network
    /// - `LlmError::Parse` if the response body does not match the schema
    pub async fn generate_content(
        &self,
        model: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<ContentResponse, LlmError> {
        let wire_request = build_request(messages, options)?;
        self.warn_missing_signatures(model, messages);

        let body = wire_request
            .to_body()
            .map_err(|e| LlmError::InvalidRequest(format!("failed to serialize request: {e}")))?;

        let url = self.generate_url(model);

        tracing::debug!(
            model,
            url = %url,
            contents = wire_request.contents.len(),
            has_system_instruction = wire_request.system_instruction.is_some(),
            tools = options.tools.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model, error = %e, "upstream request failed");
                LlmError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let provider_message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_default();
            tracing::warn!(model, status = %status, provider_message = %provider_message, "upstream returned error");
            return Err(LlmError::Upstream { status, body });
        }

        let wire_response: GoogleResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(model, error = %e, "unparseable generateContent response");
            LlmError::Parse(e)
        })?;

        let response = ContentResponse::from(wire_response);

        tracing::debug!(
            model,
            choices = response.choices.len(),
            tool_calls = response.choices.iter().map(|c| c.tool_calls.len()).sum::<usize>(),
            "received generateContent response"
        );

        Ok(response)
    }

    /// Generate content, aborting when `cancel` fires
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Cancelled` if the token is cancelled before the
    /// response arrives, otherwise the same errors as
    /// [`generate_content`](Self::generate_content).
    pub async fn generate_content_with_cancel(
        &self,
        cancel: &CancellationToken,
        model: &str,
        messages: &[Message],
        options: &CallOptions,
    ) -> Result<ContentResponse, LlmError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(model, "generateContent request cancelled");
                Err(LlmError::Cancelled)
            }
            result = self.generate_content(model, messages, options) => result,
        }
    }

    /// Warn about replayed tool calls the provider will reject
    fn warn_missing_signatures(&self, model: &str, messages: &[Message]) {
        if !self.capabilities(model).thought_signatures {
            return;
        }

        let unsigned = messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .flat_map(|m| &m.parts)
            .filter_map(|p| match p {
                ContentPart::ToolCall(call) if call.thought_signature.is_none() => Some(call.function.name.as_str()),
                _ => None,
            });

        for name in unsigned {
            tracing::warn!(model, tool = name, "replayed tool call has no thought signature");
        }
    }
}
