//! HTTP dispatch of signed requests.
//!
//! [`Transport`] is the seam between the signing pipeline and the network.
//! [`HttpTransport`] is the `reqwest` implementation used by default.

use std::future::Future;

use crate::config::ClientConfig;
use crate::constants::{FORM_CONTENT_TYPE, HMAC_HEADER};
use crate::error::{CoinPaymentsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully signed request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Hex HMAC of `body`, sent in the `hmac` header.
    pub signature: String,
    /// Encoded params: the form body for POST, the query string for GET.
    pub body: String,
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Anything but `200 OK` is a transport failure.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(CoinPaymentsError::Status {
                status: self.status,
                body: self.body.chars().take(200).collect(),
            })
        }
    }
}

/// Sends one signed request and returns whatever the server answered.
///
/// Implementations must not interpret the status code; the client does.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a client honoring the configured timeout and proxy.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none());

        if let Some(proxy_config) = &config.proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_config.url)
                .map_err(|e| CoinPaymentsError::Config(format!("invalid proxy: {e}")))?;
            if let Some(auth) = &proxy_config.auth {
                proxy = proxy.basic_auth(&auth.username, &auth.password);
            }
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| CoinPaymentsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let builder = match request.method {
            HttpMethod::Get => {
                let url = if request.body.is_empty() {
                    request.url
                } else {
                    format!("{}?{}", request.url, request.body)
                };
                self.http.get(url)
            }
            HttpMethod::Post => self
                .http
                .post(request.url)
                .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(request.body),
        };

        let resp = builder
            .header(HMAC_HEADER, request.signature)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(RawResponse { status, body })
    }
}
