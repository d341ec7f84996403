use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::hmac;
use crate::params::Params;
use crate::response::{decode, Envelope, ResponseFormat};
use crate::retry::retry_with_backoff;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse, Transport};

/// CoinPayments API client.
///
/// Holds the immutable credentials and a [`Transport`]. Every call signs its
/// own params and runs its own retry loop, so one client can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct CoinPaymentsClient<T: Transport = HttpTransport> {
    config: Arc<ClientConfig>,
    transport: T,
}

impl CoinPaymentsClient<HttpTransport> {
    /// Build a client over the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Build a client from `COINPAYMENTS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> CoinPaymentsClient<T> {
    /// Build a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn format(&self) -> ResponseFormat {
        self.config.format
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign, send and decode `params`, retrying per the configured policy.
    ///
    /// Each attempt re-signs the same params; the signature is a pure
    /// function of them, so every attempt carries an identical request.
    pub async fn request(&self, method: HttpMethod, params: &Params) -> Result<Envelope> {
        let format = self.config.format;
        retry_with_backoff(&self.config.retry, |attempt| {
            let signed = hmac::sign(params, &self.config.private_key);
            let request = HttpRequest {
                method,
                url: self.config.base_url.clone(),
                signature: signed.signature,
                body: signed.body,
            };
            async move {
                tracing::debug!(attempt = attempt + 1, ?method, "sending signed request");
                let raw: RawResponse = self.transport.send(request).await?.error_for_status()?;
                decode(&raw.body, format)
            }
        })
        .await
    }

    pub async fn get(&self, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Get, params).await
    }

    pub async fn post(&self, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Post, params).await
    }

    /// Assemble the base params for `cmd`, append `params`, and POST.
    ///
    /// Base params come first, in the order `cmd`, `key`, `version`,
    /// `format`. A caller param reusing one of those keys is an
    /// [`crate::CoinPaymentsError::Input`] and nothing is sent.
    pub async fn api_call(&self, cmd: &str, params: Params) -> Result<Envelope> {
        let mut full = Params::new()
            .with("cmd", cmd)
            .with("key", self.config.public_key.as_str())
            .with("version", self.config.version.as_str())
            .with("format", self.config.format.as_str());
        if let Err(e) = full.merge(params) {
            tracing::warn!(cmd, error = %e, "rejecting api call");
            return Err(e);
        }

        tracing::debug!(cmd, params = full.len(), "api call");
        self.post(&full).await
    }
}
