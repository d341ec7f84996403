mod common;

use coinpayments::{CoinPaymentsError, ResponseFormat};
use common::{client, xml_client, ScriptedTransport};

const RATES: &str = r#"{
    "error": "ok",
    "result": {
        "BTC": {"is_fiat": 0, "rate_btc": "1", "accepted": 1},
        "LTC": {"is_fiat": 0, "rate_btc": "0.002", "accepted": 1},
        "USD": {"is_fiat": 1, "rate_btc": "0.000025", "accepted": 1},
        "EUR": {"is_fiat": 1, "rate_btc": "0.00002", "accepted": 0}
    }
}"#;

const BALANCES: &str = r#"{
    "error": "ok",
    "result": {
        "BTC": {"balance": 200000000, "balancef": "2.00000000"},
        "LTC": {"balance": 50000000, "balancef": "0.50000000"}
    }
}"#;

fn routed() -> ScriptedTransport {
    ScriptedTransport::routed(&[("rates", RATES), ("balances", BALANCES)])
}

#[tokio::test]
async fn test_accepted_currencies_keeps_server_order() {
    let client = client(routed());
    let all = client.accepted_currencies(true).await.unwrap();
    assert_eq!(all, vec!["BTC", "LTC", "USD", "EUR"]);

    let crypto = client.accepted_currencies(false).await.unwrap();
    assert_eq!(crypto, vec!["BTC", "LTC"]);
}

#[tokio::test]
async fn test_is_accepted_is_case_insensitive() {
    let client = client(routed());
    assert!(client.is_accepted("ltc", true).await.unwrap());
    assert!(client.is_accepted("usd", true).await.unwrap());
    assert!(!client.is_accepted("usd", false).await.unwrap());
    assert!(!client.is_accepted("DOGE", true).await.unwrap());
}

#[tokio::test]
async fn test_balances_accepted_reports_missing_entries() {
    let client = client(routed());
    let accepted = client.balances_accepted().await.unwrap();
    assert_eq!(accepted.balances.len(), 2);
    assert_eq!(accepted.balances["BTC"], "2.00000000");
    assert_eq!(accepted.balances["LTC"], "0.50000000");
    assert_eq!(accepted.missing, vec!["USD", "EUR"]);
}

#[tokio::test]
async fn test_coin_balance() {
    let client = client(routed());
    let resp = client.coin_balance("btc").await.unwrap();
    assert!(resp.is_ok());
    assert_eq!(resp.result["balancef"], "2.00000000");

    let params = client.transport().params_of(0);
    assert!(params.contains(&("all".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_coin_balance_unknown_coin() {
    let client = client(routed());
    let err = client.coin_balance("DOGE").await.unwrap_err();
    assert!(matches!(err, CoinPaymentsError::Input(_)));
}

#[tokio::test]
async fn test_coin_balance_requires_json_without_network() {
    let client = xml_client(routed());
    let err = client.coin_balance("BTC").await.unwrap_err();
    assert!(matches!(err, CoinPaymentsError::Format(ResponseFormat::Xml)));
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn test_helpers_require_json() {
    let client = xml_client(routed());
    assert!(matches!(
        client.accepted_currencies(true).await,
        Err(CoinPaymentsError::Format(_))
    ));
    assert!(matches!(
        client.balances_fiat("USD", false, false).await,
        Err(CoinPaymentsError::Format(_))
    ));
    assert!(matches!(
        client.conversion_fiat("BTC", "USD", None).await,
        Err(CoinPaymentsError::Format(_))
    ));
    assert_eq!(client.transport().request_count(), 0);
}

#[tokio::test]
async fn test_conversion_fiat_uses_given_table() {
    let client = client(routed());
    let rates = client.rate_table(Default::default()).await.unwrap();
    assert_eq!(client.transport().request_count(), 1);

    let rate = client.conversion_fiat("btc", "usd", Some(&rates)).await.unwrap();
    assert_eq!(rate, 40000.0);
    assert_eq!(client.transport().request_count(), 1);

    let err = client
        .conversion_fiat("BTC", "JPY", Some(&rates))
        .await
        .unwrap_err();
    assert!(matches!(err, CoinPaymentsError::Input(_)));
}

#[tokio::test]
async fn test_balances_fiat_end_to_end() {
    let transport = ScriptedTransport::routed(&[
        (
            "rates",
            r#"{"error":"ok","result":{"BTC":{"rate_btc":"1"},"USD":{"rate_btc":"0.000025"}}}"#,
        ),
        ("balances", r#"{"error":"ok","result":{"BTC":{"balancef":"2"}}}"#),
    ]);
    let client = client(transport);

    let sheet = client.balances_fiat("USD", false, false).await.unwrap();
    assert_eq!(sheet.converted.len(), 1);
    assert_eq!(sheet.converted["BTC"], 80000.0);
    assert!(sheet.skipped.contains_key("USD"));
    assert_eq!(sheet.total(), 80000.0);

    // balances are fetched first, then a single rates call
    let rates = client.transport().params_of(1);
    assert!(rates.contains(&("cmd".to_string(), "rates".to_string())));
    assert!(rates.contains(&("accepted".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_balances_fiat_isolates_failing_currency() {
    let client = client(routed());
    let sheet = client.balances_fiat("usd", true, true).await.unwrap();

    assert_eq!(sheet.converted.len(), 2);
    assert_eq!(sheet.converted["BTC"], 80000.0);
    assert!((sheet.converted["LTC"] - 40.0).abs() < 1e-9);
    assert_eq!(
        sheet.skipped.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["EUR", "USD"]
    );
}

#[tokio::test]
async fn test_remote_error_propagates_from_helpers() {
    let transport = ScriptedTransport::routed(&[("rates", r#"{"error":"Invalid API key"}"#)]);
    let client = client(transport);
    match client.accepted_currencies(true).await {
        Err(CoinPaymentsError::Remote(msg)) => assert_eq!(msg, "Invalid API key"),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_rates_shape() {
    let transport = ScriptedTransport::routed(&[("rates", r#"{"error":"ok","result":[]}"#)]);
    let client = client(transport);
    assert!(matches!(
        client.accepted_currencies(true).await,
        Err(CoinPaymentsError::UnexpectedResult(_))
    ));
}
