//! The remote command catalog.
//!
//! Each method names one `cmd`, shapes its params (defaults, `1`/`0` flags,
//! optional fields omitted when unset) and delegates to
//! [`CoinPaymentsClient::api_call`]. None of them inspect the result.
//!
//! Extra params passed alongside a command may add fields but never replace
//! one the command sets; a collision is an input error raised before
//! anything is sent.

use crate::client::CoinPaymentsClient;
use crate::constants::{DEFAULT_FIAT, MAX_TX_IDS_LIMIT};
use crate::error::Result;
use crate::params::{ParamValue, Params};
use crate::response::Envelope;
use crate::transport::Transport;

/// Options for the `rates` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatesOptions {
    /// Omit the long names and confirmation counts.
    pub short: bool,
    /// Flag which coins are enabled on the acceptance settings page.
    pub specify_accepted: bool,
    /// Restrict cryptocurrencies to accepted ones (fiat is always listed).
    pub only_accepted: bool,
}

impl Default for RatesOptions {
    fn default() -> Self {
        Self {
            short: true,
            specify_accepted: true,
            only_accepted: true,
        }
    }
}

impl RatesOptions {
    /// Value of the `accepted` param: 2 = only accepted, 1 = flag accepted, 0 = neither.
    pub fn accepted_flag(&self) -> u32 {
        match (self.specify_accepted, self.only_accepted) {
            (true, true) => 2,
            (true, false) => 1,
            _ => 0,
        }
    }
}

/// A payment to receive from a buyer.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransaction {
    pub amount: ParamValue,
    pub buyer_email: String,
    /// Currency the buyer pays in (`currency2`).
    pub receive_currency: String,
    /// Currency `amount` is denominated in (`currency1`).
    pub base_currency: String,
    pub ipn_url: Option<String>,
    pub extra: Params,
}

impl CreateTransaction {
    pub fn new(
        amount: impl Into<ParamValue>,
        buyer_email: impl Into<String>,
        receive_currency: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            buyer_email: buyer_email.into(),
            receive_currency: receive_currency.into(),
            base_currency: DEFAULT_FIAT.to_string(),
            ipn_url: None,
            extra: Params::new(),
        }
    }

    pub fn base_currency(mut self, currency: impl Into<String>) -> Self {
        self.base_currency = currency.into();
        self
    }

    pub fn ipn_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_url = Some(url.into());
        self
    }

    /// Any other documented field, e.g. `item_name`, `invoice`, `custom`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }

    fn into_params(self) -> Result<Params> {
        let mut params = Params::new()
            .with("amount", self.amount)
            .with("currency1", self.base_currency)
            .with("currency2", self.receive_currency)
            .with("buyer_email", self.buyer_email)
            .with_opt("ipn_url", self.ipn_url);
        params.merge(self.extra)?;
        Ok(params)
    }
}

/// A withdrawal to an address or a `$PayByName` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWithdrawal {
    pub amount: ParamValue,
    /// Currency the recipient receives (`currency`).
    pub receive_currency: String,
    /// Currency `amount` is denominated in (`currency2`); defaults to
    /// `receive_currency` on the server side.
    pub base_currency: Option<String>,
    pub address: Option<String>,
    pub ipn_url: Option<String>,
    /// Skip the email confirmation step.
    pub auto_confirm: bool,
    pub extra: Params,
}

impl CreateWithdrawal {
    pub fn new(amount: impl Into<ParamValue>, receive_currency: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            receive_currency: receive_currency.into(),
            base_currency: None,
            address: None,
            ipn_url: None,
            auto_confirm: false,
            extra: Params::new(),
        }
    }

    pub fn base_currency(mut self, currency: impl Into<String>) -> Self {
        self.base_currency = Some(currency.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn ipn_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_url = Some(url.into());
        self
    }

    pub fn auto_confirm(mut self, auto_confirm: bool) -> Self {
        self.auto_confirm = auto_confirm;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }

    fn into_params(self) -> Result<Params> {
        let mut params = Params::new()
            .with("amount", self.amount)
            .with("currency", self.receive_currency)
            .with_opt("currency2", self.base_currency)
            .with_opt("ipn_url", self.ipn_url)
            .with("auto_confirm", self.auto_confirm)
            .with_opt("address", self.address);
        params.merge(self.extra)?;
        Ok(params)
    }
}

/// One entry of a `create_mass_withdrawal` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MassWithdrawalEntry {
    pub amount: ParamValue,
    pub currency: String,
    pub address: Option<String>,
    pub pbntag: Option<String>,
    pub currency2: Option<String>,
    pub dest_tag: Option<String>,
}

impl MassWithdrawalEntry {
    pub fn to_address(
        amount: impl Into<ParamValue>,
        currency: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
            address: Some(address.into()),
            pbntag: None,
            currency2: None,
            dest_tag: None,
        }
    }

    pub fn to_pbntag(
        amount: impl Into<ParamValue>,
        currency: impl Into<String>,
        pbntag: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            currency: currency.into(),
            address: None,
            pbntag: Some(pbntag.into()),
            currency2: None,
            dest_tag: None,
        }
    }
}

/// Flatten a batch into `wd[wdN][field]` params, entries numbered from 1.
pub fn mass_withdrawal_params(withdrawals: &[MassWithdrawalEntry]) -> Params {
    let mut params = Params::new();
    for (i, wd) in withdrawals.iter().enumerate() {
        let prefix = format!("wd[wd{}]", i + 1);
        params.insert(format!("{prefix}[amount]"), wd.amount.clone());
        params.insert(format!("{prefix}[currency]"), wd.currency.as_str());
        let optional = [
            ("address", &wd.address),
            ("pbntag", &wd.pbntag),
            ("currency2", &wd.currency2),
            ("dest_tag", &wd.dest_tag),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                params.insert(format!("{prefix}[{field}]"), v.as_str());
            }
        }
    }
    params
}

fn list_params(limit: u32, newer_than: u64, extra: Params) -> Result<Params> {
    let mut params = Params::new()
        .with("limit", limit)
        .with("newer", ParamValue::Int(i64::try_from(newer_than).unwrap_or(i64::MAX)));
    params.merge(extra)?;
    Ok(params)
}

impl<T: Transport> CoinPaymentsClient<T> {
    // Account

    pub async fn get_basic_info(&self) -> Result<Envelope> {
        self.api_call("get_basic_info", Params::new()).await
    }

    pub async fn rates(&self, options: RatesOptions) -> Result<Envelope> {
        let params = Params::new()
            .with("short", options.short)
            .with("accepted", options.accepted_flag());
        self.api_call("rates", params).await
    }

    // Receiving payments

    pub async fn create_transaction(&self, tx: CreateTransaction) -> Result<Envelope> {
        self.api_call("create_transaction", tx.into_params()?).await
    }

    pub async fn get_callback_address(
        &self,
        currency: &str,
        ipn_url: Option<&str>,
        extra: Params,
    ) -> Result<Envelope> {
        let mut params = Params::new()
            .with("currency", currency)
            .with_opt("ipn_url", ipn_url);
        params.merge(extra)?;
        self.api_call("get_callback_address", params).await
    }

    /// Look up one payment. `full` also returns the checkout details.
    pub async fn get_tx_info(&self, txid: &str, full: bool) -> Result<Envelope> {
        let params = Params::new().with("txid", txid).with("full", full);
        self.api_call("get_tx_info", params).await
    }

    /// Payment ids from the history, newest first. `limit` is capped at 100;
    /// the server's own default is 25 ([`crate::constants::DEFAULT_LIST_LIMIT`]).
    /// A `limit` in `extra` is rejected rather than bypassing the cap.
    pub async fn get_tx_ids(&self, limit: u32, newer_than: u64, extra: Params) -> Result<Envelope> {
        let limit = limit.min(MAX_TX_IDS_LIMIT);
        self.api_call("get_tx_ids", list_params(limit, newer_than, extra)?)
            .await
    }

    // Wallet

    /// Coin balances. Zero balances are only included with `all_coins`.
    pub async fn balances(&self, all_coins: bool) -> Result<Envelope> {
        self.api_call("balances", Params::new().with("all", all_coins))
            .await
    }

    pub async fn get_deposit_address(&self, currency: &str) -> Result<Envelope> {
        self.api_call("get_deposit_address", Params::new().with("currency", currency))
            .await
    }

    // Outbound funds

    /// Transfer to another CoinPayments merchant.
    pub async fn create_transfer(
        &self,
        amount: impl Into<ParamValue>,
        currency: &str,
        merchant_id: &str,
        auto_confirm: bool,
        extra: Params,
    ) -> Result<Envelope> {
        let mut params = Params::new()
            .with("amount", amount)
            .with("currency", currency)
            .with("merchant", merchant_id)
            .with("auto_confirm", auto_confirm);
        params.merge(extra)?;
        self.api_call("create_transfer", params).await
    }

    pub async fn create_withdrawal(&self, withdrawal: CreateWithdrawal) -> Result<Envelope> {
        self.api_call("create_withdrawal", withdrawal.into_params()?)
            .await
    }

    pub async fn create_mass_withdrawal(
        &self,
        withdrawals: &[MassWithdrawalEntry],
    ) -> Result<Envelope> {
        self.api_call("create_mass_withdrawal", mass_withdrawal_params(withdrawals))
            .await
    }

    pub async fn cancel_withdrawal(&self, withdrawal_id: &str) -> Result<Envelope> {
        self.api_call("cancel_withdrawal", Params::new().with("id", withdrawal_id))
            .await
    }

    /// Convert `amount` of `from` into `to`, optionally sending the proceeds
    /// to `address`.
    pub async fn convert(
        &self,
        amount: impl Into<ParamValue>,
        from: &str,
        to: &str,
        address: Option<&str>,
        extra: Params,
    ) -> Result<Envelope> {
        let mut params = Params::new()
            .with("amount", amount)
            .with("from", from)
            .with("to", to)
            .with_opt("address", address);
        params.merge(extra)?;
        self.api_call("convert", params).await
    }

    pub async fn convert_limits(&self, from: &str, to: &str) -> Result<Envelope> {
        let params = Params::new().with("from", from).with("to", to);
        self.api_call("convert_limits", params).await
    }

    pub async fn get_withdrawal_history(
        &self,
        limit: u32,
        newer_than: u64,
        extra: Params,
    ) -> Result<Envelope> {
        self.api_call("get_withdrawal_history", list_params(limit, newer_than, extra)?)
            .await
    }

    pub async fn get_withdrawal_info(&self, withdrawal_id: &str) -> Result<Envelope> {
        self.api_call("get_withdrawal_info", Params::new().with("id", withdrawal_id))
            .await
    }

    pub async fn get_conversion_info(&self, conversion_id: &str) -> Result<Envelope> {
        self.api_call("get_conversion_info", Params::new().with("id", conversion_id))
            .await
    }

    // $PayByName

    /// `pbntag` may be given with or without the leading `$`.
    pub async fn get_pbn_info(&self, pbntag: &str) -> Result<Envelope> {
        self.api_call("get_pbn_info", Params::new().with("pbntag", pbntag))
            .await
    }

    pub async fn get_pbn_list(&self) -> Result<Envelope> {
        self.api_call("get_pbn_list", Params::new()).await
    }

    pub async fn buy_pbn_tags(&self, coin: &str, num: u32) -> Result<Envelope> {
        let params = Params::new().with("coin", coin).with("num", num);
        self.api_call("buy_pbn_tags", params).await
    }

    pub async fn claim_pbn_tag(&self, tag_id: &str, name: &str) -> Result<Envelope> {
        let params = Params::new().with("tagid", tag_id).with("name", name);
        self.api_call("claim_pbn_tag", params).await
    }

    /// Update profile fields (`name`, `email`, `url`, `image`) given in `fields`.
    /// Fields left out are unchanged.
    pub async fn update_pbn_tag(&self, tag_id: &str, fields: Params) -> Result<Envelope> {
        let mut params = Params::new().with("tagid", tag_id);
        params.merge(fields)?;
        self.api_call("update_pbn_tag", params).await
    }

    pub async fn renew_pbn_tag(&self, tag_id: &str, coin: &str, years: u32) -> Result<Envelope> {
        let params = Params::new()
            .with("tagid", tag_id)
            .with("coin", coin)
            .with("years", years);
        self.api_call("renew_pbn_tag", params).await
    }

    pub async fn delete_pbn_tag(&self, tag_id: &str) -> Result<Envelope> {
        self.api_call("delete_pbn_tag", Params::new().with("tagid", tag_id))
            .await
    }

    pub async fn claim_pbn_coupon(&self, coupon: &str) -> Result<Envelope> {
        self.api_call("claim_pbn_coupon", Params::new().with("coupon", coupon))
            .await
    }
}
