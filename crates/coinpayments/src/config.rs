use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::constants::{API_URL, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};
use crate::error::{CoinPaymentsError, Result};
use crate::response::ResponseFormat;
use crate::retry::RetryPolicy;

/// Basic auth credentials for an HTTP proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Outbound proxy every request is routed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
    pub auth: Option<ProxyAuth>,
}

/// Credentials and transport settings owned by a client for its lifetime.
#[derive(Clone)]
pub struct ClientConfig {
    /// Public API key, sent as `key`.
    pub public_key: String,
    /// Private API key, only ever used as the HMAC key.
    pub private_key: String,
    /// API version, sent as `version`.
    pub version: String,
    /// Requested response format, sent as `format`.
    pub format: ResponseFormat,
    /// Endpoint every command is posted to.
    pub base_url: String,
    pub proxy: Option<ProxyConfig>,
    pub retry: RetryPolicy,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("version", &self.version)
            .field("format", &self.format)
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            version: DEFAULT_API_VERSION.to_string(),
            format: ResponseFormat::default(),
            base_url: API_URL.to_string(),
            proxy: None,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_proxy(mut self, url: impl Into<String>) -> Self {
        let auth = self.proxy.take().and_then(|p| p.auth);
        self.proxy = Some(ProxyConfig {
            url: url.into(),
            auth,
        });
        self
    }

    /// Attach basic auth to the configured proxy. Has no effect without
    /// a prior [`ClientConfig::with_proxy`].
    pub fn with_proxy_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        if let Some(proxy) = self.proxy.as_mut() {
            proxy.auth = Some(ProxyAuth {
                username: username.into(),
                password: password.into(),
            });
        }
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings that can be checked without a network call.
    pub fn validate(&self) -> Result<()> {
        if self.public_key.is_empty() {
            return Err(CoinPaymentsError::Config("public key is empty".to_string()));
        }
        if self.private_key.is_empty() {
            return Err(CoinPaymentsError::Config("private key is empty".to_string()));
        }
        Url::parse(&self.base_url)
            .map_err(|e| CoinPaymentsError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        if let Some(proxy) = &self.proxy {
            Url::parse(&proxy.url)
                .map_err(|e| CoinPaymentsError::Config(format!("invalid proxy URL {}: {e}", proxy.url)))?;
        }
        if self.retry.max_attempts == 0 {
            return Err(CoinPaymentsError::Config(
                "retry policy needs at least one attempt".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from `COINPAYMENTS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let public_key = required("COINPAYMENTS_PUBLIC_KEY")?;
        let private_key = required("COINPAYMENTS_PRIVATE_KEY")?;

        let mut config = Self::new(public_key, private_key);

        if let Some(version) = optional("COINPAYMENTS_API_VERSION") {
            config.version = version;
        }
        if let Some(format) = optional("COINPAYMENTS_FORMAT") {
            config.format = format.parse()?;
        }
        if let Some(base_url) = optional("COINPAYMENTS_API_URL") {
            config.base_url = base_url;
        }
        if let Some(proxy) = optional("COINPAYMENTS_PROXY") {
            config = config.with_proxy(proxy);
            if let Some(user) = optional("COINPAYMENTS_PROXY_USER") {
                let password = optional("COINPAYMENTS_PROXY_PASSWORD").unwrap_or_default();
                config = config.with_proxy_auth(user, password);
            }
        }
        if let Some(attempts) = optional("COINPAYMENTS_MAX_ATTEMPTS") {
            config.retry.max_attempts = attempts.parse().map_err(|_| {
                CoinPaymentsError::Config(format!("invalid COINPAYMENTS_MAX_ATTEMPTS: {attempts}"))
            })?;
        }
        if let Some(secs) = optional("COINPAYMENTS_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CoinPaymentsError::Config(format!("invalid COINPAYMENTS_TIMEOUT_SECS: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| {
        CoinPaymentsError::Config(format!("missing required environment variable: {name}"))
    })
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}
