use thiserror::Error;

use crate::response::ResponseFormat;

/// Errors returned by CoinPayments operations.
#[derive(Debug, Error)]
pub enum CoinPaymentsError {
    /// Connection, proxy or timeout failure inside the HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be parsed in the configured response format.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The structured envelope reported a failure.
    #[error("remote error: {0}")]
    Remote(String),

    /// A caller-supplied identifier is not in the set the server returned, or
    /// a caller param collides with one the command sets itself.
    #[error("invalid input: {0}")]
    Input(String),

    /// The operation needs structured decoding but the client is configured otherwise.
    #[error("operation requires json responses, client is configured for {0}")]
    Format(ResponseFormat),

    /// A successful envelope whose payload does not have the shape the
    /// operation relies on.
    #[error("unexpected result payload: {0}")]
    UnexpectedResult(String),

    #[error("config error: {0}")]
    Config(String),
}

impl CoinPaymentsError {
    /// Transport-level failures are worth another attempt; semantic and
    /// client-side rejections are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Decode(_))
    }
}

pub type Result<T, E = CoinPaymentsError> = std::result::Result<T, E>;
