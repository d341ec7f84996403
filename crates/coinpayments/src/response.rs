use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::SUCCESS_STATUS;
use crate::error::{CoinPaymentsError, Result};

/// Response format requested from the server. Fixed for the lifetime of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = CoinPaymentsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(CoinPaymentsError::Config(format!(
                "unknown response format: {other}"
            ))),
        }
    }
}

/// Structured `{ "error": ..., "result": ... }` envelope.
///
/// `result` is only meaningful when `error` is `"ok"`; otherwise `error`
/// holds the server's message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub error: String,
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    /// Wrap a payload in a successful envelope.
    pub fn ok(result: Value) -> Self {
        Self {
            error: SUCCESS_STATUS.to_string(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error == SUCCESS_STATUS
    }

    /// Fail with [`CoinPaymentsError::Remote`] unless the status is `"ok"`.
    pub fn raise_for_errors(&self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(CoinPaymentsError::Remote(self.error.clone()))
        }
    }

    /// The result payload, or the remote error.
    pub fn into_result(self) -> Result<Value> {
        self.raise_for_errors()?;
        Ok(self.result)
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(error: {}, result: {})", self.error, self.result)
    }
}

/// Decoded response: structured under [`ResponseFormat::Json`], the raw body
/// under [`ResponseFormat::Xml`].
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Structured(ApiResponse),
    Raw(String),
}

impl Envelope {
    pub fn as_structured(&self) -> Option<&ApiResponse> {
        match self {
            Self::Structured(resp) => Some(resp),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Raw(text) => Some(text),
        }
    }

    /// The structured envelope, or a format error for a raw body.
    pub fn into_structured(self) -> Result<ApiResponse> {
        match self {
            Self::Structured(resp) => Ok(resp),
            Self::Raw(_) => Err(CoinPaymentsError::Format(ResponseFormat::Xml)),
        }
    }

    /// Raise the remote error of a structured envelope. A raw body is left
    /// to the caller to interpret.
    pub fn raise_for_errors(&self) -> Result<()> {
        match self {
            Self::Structured(resp) => resp.raise_for_errors(),
            Self::Raw(_) => Ok(()),
        }
    }

    /// Shorthand for `into_structured()?.into_result()`.
    pub fn into_result(self) -> Result<Value> {
        self.into_structured()?.into_result()
    }
}

/// Decode a response body according to the configured format.
pub fn decode(body: &str, format: ResponseFormat) -> Result<Envelope> {
    match format {
        ResponseFormat::Json => Ok(Envelope::Structured(serde_json::from_str(body)?)),
        ResponseFormat::Xml => Ok(Envelope::Raw(body.to_string())),
    }
}
