//! Async client for the CoinPayments merchant API.
//!
//! Every command is a form-encoded POST to a single endpoint, authenticated
//! by an HMAC-SHA512 of the exact body bytes keyed with the private API key.
//! The server recomputes that HMAC over what it receives, so parameters are
//! encoded strictly in insertion order.
//!
//! # Pipeline
//!
//! - [`Params`] are encoded and signed ([`hmac::sign`])
//! - a [`Transport`] sends them with the `hmac` header, retried per [`RetryPolicy`]
//! - the body is decoded into an [`Envelope`]: [`ApiResponse`] for JSON, raw text for XML
//! - [`ApiResponse::raise_for_errors`] turns a non-`"ok"` status into an error
//!
//! # Quick example
//!
//! ```no_run
//! use coinpayments::{ClientConfig, CoinPaymentsClient};
//!
//! # #[tokio::main]
//! # async fn main() -> coinpayments::Result<()> {
//! let client = CoinPaymentsClient::new(ClientConfig::new("PUBLIC_KEY", "PRIVATE_KEY"))?;
//!
//! let info = client.get_basic_info().await?.into_result()?;
//! println!("merchant: {}", info["merchant_id"]);
//!
//! let sheet = client.balances_fiat("USD", false, false).await?;
//! println!("total: {:.2} USD", sheet.total());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod helpers;
pub mod hmac;
pub mod params;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::CoinPaymentsClient;
pub use commands::{CreateTransaction, CreateWithdrawal, MassWithdrawalEntry, RatesOptions};
pub use config::{ClientConfig, ProxyAuth, ProxyConfig};
pub use error::{CoinPaymentsError, Result};
pub use helpers::{conversion_rate, AcceptedBalances, FiatBalances, RateTable};
pub use params::{ParamValue, Params};
pub use response::{decode, ApiResponse, Envelope, ResponseFormat};
pub use retry::RetryPolicy;
pub use transport::{HttpMethod, HttpRequest, HttpTransport, RawResponse, Transport};
