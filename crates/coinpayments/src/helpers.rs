//! Client-side conveniences composed from `rates` and `balances`.
//!
//! All of these need structured responses and fail with
//! [`CoinPaymentsError::Format`] before touching the network when the client
//! is configured for XML.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::client::CoinPaymentsClient;
use crate::commands::RatesOptions;
use crate::error::{CoinPaymentsError, Result};
use crate::response::{ApiResponse, ResponseFormat};
use crate::transport::Transport;

/// Rate table keyed by upper-case currency code, as returned by `rates`.
pub type RateTable = Map<String, Value>;

/// Balance sheet converted into one fiat currency.
///
/// Currencies that could not be converted are listed in `skipped` with the
/// reason, so a missing entry in `converted` is never mistaken for a zero
/// balance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiatBalances {
    pub converted: BTreeMap<String, f64>,
    pub skipped: BTreeMap<String, String>,
}

impl FiatBalances {
    pub fn total(&self) -> f64 {
        self.converted.values().sum()
    }
}

/// `balancef` of each accepted currency.
///
/// Accepted currencies with no entry (or no `balancef`) in the balance sheet
/// are listed in `missing`, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedBalances {
    pub balances: BTreeMap<String, String>,
    pub missing: Vec<String>,
}

/// Read a numeric field that the API may send as a string or a number.
fn numeric_field(entry: &Value, field: &str) -> Option<f64> {
    match entry.get(field)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn is_fiat(entry: &Value) -> bool {
    numeric_field(entry, "is_fiat").is_some_and(|v| v != 0.0)
}

/// Price of `coin` in units of `base`, from a rate table where every entry
/// is priced against the same pivot (`rate_btc`).
///
/// Both codes are upper-cased. A currency missing from the table or with an
/// unusable rate is an input error.
pub fn conversion_rate(rates: &RateTable, coin: &str, base: &str) -> Result<f64> {
    let rate_of = |code: &str| -> Result<f64> {
        let code = code.to_uppercase();
        let entry = rates
            .get(&code)
            .ok_or_else(|| CoinPaymentsError::Input(format!("unknown currency: {code}")))?;
        numeric_field(entry, "rate_btc")
            .filter(|r| r.is_finite())
            .ok_or_else(|| CoinPaymentsError::Input(format!("no usable rate for {code}")))
    };

    let coin_rate = rate_of(coin)?;
    let base_rate = rate_of(base)?;
    if base_rate == 0.0 {
        return Err(CoinPaymentsError::Input(format!(
            "rate of {} is zero",
            base.to_uppercase()
        )));
    }
    Ok(coin_rate / base_rate)
}

/// Pair each currency of `rates` with its balance converted into `base`.
pub fn convert_balances(rates: &RateTable, balances: &Map<String, Value>, base: &str) -> FiatBalances {
    let mut out = FiatBalances::default();

    for coin in rates.keys() {
        let rate = match conversion_rate(rates, coin, base) {
            Ok(rate) => rate,
            Err(e) => {
                tracing::debug!(coin, error = %e, "skipping currency: conversion failed");
                out.skipped.insert(coin.clone(), e.to_string());
                continue;
            }
        };

        let Some(entry) = balances.get(coin) else {
            tracing::debug!(coin, "skipping currency: no balance entry");
            out.skipped.insert(coin.clone(), "no balance entry".to_string());
            continue;
        };

        match numeric_field(entry, "balancef") {
            Some(balance) => {
                out.converted.insert(coin.clone(), balance * rate);
            }
            None => {
                tracing::debug!(coin, "skipping currency: unreadable balance");
                out.skipped
                    .insert(coin.clone(), "balance is missing or not a number".to_string());
            }
        }
    }

    out
}

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoinPaymentsError::UnexpectedResult(format!(
            "{what} is not an object: {other}"
        ))),
    }
}

impl<T: Transport> CoinPaymentsClient<T> {
    fn require_json(&self) -> Result<()> {
        match self.format() {
            ResponseFormat::Json => Ok(()),
            other => Err(CoinPaymentsError::Format(other)),
        }
    }

    /// The `rates` result as a table. Remote errors are raised.
    pub async fn rate_table(&self, options: RatesOptions) -> Result<RateTable> {
        self.require_json()?;
        let result = self.rates(options).await?.into_result()?;
        into_object(result, "rates result")
    }

    async fn balance_table(&self, all_coins: bool) -> Result<Map<String, Value>> {
        self.require_json()?;
        let result = self.balances(all_coins).await?.into_result()?;
        into_object(result, "balances result")
    }

    /// Currency codes accepted by the merchant, in server order. With
    /// `fiat_included == false` only cryptocurrencies are listed.
    pub async fn accepted_currencies(&self, fiat_included: bool) -> Result<Vec<String>> {
        let rates = self.rate_table(RatesOptions::default()).await?;
        Ok(rates
            .into_iter()
            .filter(|(_, entry)| fiat_included || !is_fiat(entry))
            .map(|(code, _)| code)
            .collect())
    }

    pub async fn is_accepted(&self, currency: &str, fiat_included: bool) -> Result<bool> {
        let currency = currency.to_uppercase();
        Ok(self
            .accepted_currencies(fiat_included)
            .await?
            .contains(&currency))
    }

    /// `balancef` of every accepted currency, with the accepted currencies
    /// the balance sheet has nothing for.
    pub async fn balances_accepted(&self) -> Result<AcceptedBalances> {
        let accepted = self.accepted_currencies(true).await?;
        let balances = self.balance_table(false).await?;

        let mut out = AcceptedBalances::default();
        for coin in accepted {
            match balances.get(&coin).and_then(|entry| entry.get("balancef")) {
                Some(Value::String(s)) => {
                    out.balances.insert(coin, s.clone());
                }
                Some(other) => {
                    out.balances.insert(coin, other.to_string());
                }
                None => {
                    tracing::debug!(coin, "accepted currency has no balance entry");
                    out.missing.push(coin);
                }
            }
        }
        Ok(out)
    }

    /// Balance entry of a single coin, wrapped in a successful envelope.
    pub async fn coin_balance(&self, coin: &str) -> Result<ApiResponse> {
        self.require_json()?;
        let coin = coin.to_uppercase();
        let balances = self.balance_table(true).await?;

        match balances.get(&coin) {
            Some(entry) => Ok(ApiResponse::ok(entry.clone())),
            None => Err(CoinPaymentsError::Input(format!(
                "coin {coin} is not currently supported"
            ))),
        }
    }

    /// Price of `coin` in `base_currency`. Uses `rates` when given, otherwise
    /// fetches the rate table first.
    pub async fn conversion_fiat(
        &self,
        coin: &str,
        base_currency: &str,
        rates: Option<&RateTable>,
    ) -> Result<f64> {
        match rates {
            Some(rates) => conversion_rate(rates, coin, base_currency),
            None => {
                let rates = self.rate_table(RatesOptions::default()).await?;
                conversion_rate(&rates, coin, base_currency)
            }
        }
    }

    /// Every balance converted into `base_currency`.
    ///
    /// Fetches balances and rates once each. Currencies that cannot be
    /// converted are reported in [`FiatBalances::skipped`] rather than
    /// failing the whole sheet.
    pub async fn balances_fiat(
        &self,
        base_currency: &str,
        only_accepted: bool,
        all_coins: bool,
    ) -> Result<FiatBalances> {
        let balances = self.balance_table(all_coins).await?;
        let rates = self
            .rate_table(RatesOptions {
                only_accepted,
                ..RatesOptions::default()
            })
            .await?;

        let sheet = convert_balances(&rates, &balances, base_currency);
        tracing::debug!(
            base = base_currency,
            converted = sheet.converted.len(),
            skipped = sheet.skipped.len(),
            "converted balance sheet"
        );
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_conversion_rate_ratio() {
        let rates = table(json!({
            "BTC": {"rate_btc": "1"},
            "LTC": {"rate_btc": 0.002},
            "USD": {"rate_btc": "0.000025"},
        }));
        assert_eq!(conversion_rate(&rates, "btc", "usd").unwrap(), 40000.0);
        let ltc_usd = conversion_rate(&rates, "LTC", "USD").unwrap();
        assert!((ltc_usd - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversion_rate_unknown_currency() {
        let rates = table(json!({"BTC": {"rate_btc": "1"}}));
        assert!(matches!(
            conversion_rate(&rates, "BTC", "EUR"),
            Err(CoinPaymentsError::Input(_))
        ));
        assert!(matches!(
            conversion_rate(&rates, "DOGE", "BTC"),
            Err(CoinPaymentsError::Input(_))
        ));
    }

    #[test]
    fn test_conversion_rate_bad_values() {
        let rates = table(json!({
            "BTC": {"rate_btc": "1"},
            "ZERO": {"rate_btc": "0"},
            "TEXT": {"rate_btc": "n/a"},
        }));
        assert!(conversion_rate(&rates, "BTC", "ZERO").is_err());
        assert!(conversion_rate(&rates, "TEXT", "BTC").is_err());
    }

    #[test]
    fn test_convert_balances_reports_skipped() {
        let rates = table(json!({
            "BTC": {"rate_btc": "1"},
            "LTC": {"rate_btc": "0.002"},
            "ETH": {"rate_btc": "0.05"},
            "USD": {"rate_btc": "0.000025"},
        }));
        let balances = table(json!({
            "BTC": {"balancef": "2"},
            "ETH": {"balancef": "1.5"},
        }));

        let sheet = convert_balances(&rates, &balances, "USD");
        assert_eq!(sheet.converted.len(), 2);
        assert_eq!(sheet.converted["BTC"], 80000.0);
        assert!((sheet.converted["ETH"] - 3000.0).abs() < 1e-6);
        assert_eq!(
            sheet.skipped.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["LTC", "USD"]
        );
    }

    #[test]
    fn test_is_fiat_accepts_string_or_number() {
        assert!(is_fiat(&json!({"is_fiat": 1})));
        assert!(is_fiat(&json!({"is_fiat": "1"})));
        assert!(!is_fiat(&json!({"is_fiat": 0})));
        assert!(!is_fiat(&json!({})));
    }
}
