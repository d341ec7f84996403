#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use coinpayments::{
    ClientConfig, CoinPaymentsClient, HttpRequest, RawResponse, ResponseFormat, Result,
    RetryPolicy, Transport,
};

/// Replays a fixed sequence of responses and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    routes: HashMap<String, String>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<RawResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Answer every request for `cmd` with `body` (status 200).
    pub fn routed(routes: &[(&str, &str)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(cmd, body)| (cmd.to_string(), body.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Decoded params of the `n`th request.
    pub fn params_of(&self, n: usize) -> Vec<(String, String)> {
        let body = self.requests.lock().unwrap()[n].body.clone();
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let cmd = url::form_urlencoded::parse(request.body.as_bytes())
            .find(|(k, _)| k == "cmd")
            .map(|(_, v)| v.into_owned());
        self.requests.lock().unwrap().push(request);

        if let Some(body) = cmd.and_then(|c| self.routes.get(&c)) {
            return Ok(RawResponse::ok(body.clone()));
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("test-public", "test-private").with_retry_policy(RetryPolicy::immediate(3))
}

pub fn client(transport: ScriptedTransport) -> CoinPaymentsClient<ScriptedTransport> {
    CoinPaymentsClient::with_transport(config(), transport).unwrap()
}

pub fn xml_client(transport: ScriptedTransport) -> CoinPaymentsClient<ScriptedTransport> {
    CoinPaymentsClient::with_transport(config().with_format(ResponseFormat::Xml), transport)
        .unwrap()
}

pub fn status(code: u16) -> Result<RawResponse> {
    Ok(RawResponse {
        status: code,
        body: format!("status {code}"),
    })
}

pub fn ok_json(body: serde_json::Value) -> Result<RawResponse> {
    Ok(RawResponse::ok(body.to_string()))
}
