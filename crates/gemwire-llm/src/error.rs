use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// Caller input could not be translated into a provider request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: StatusCode,
        /// Raw response body, verbatim
        body: String,
    },

    /// Request could not be sent or its body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Caller cancelled the request before it completed
    #[error("request cancelled")]
    Cancelled,

    /// Response body does not match the expected schema
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LlmError {
    /// Whether the failure happened on the wire rather than in translation
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Transport(_) | Self::Cancelled)
    }

    /// HTTP status reported by the provider, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}
