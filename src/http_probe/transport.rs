use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde_json::{Map, Value};

use super::report;
use super::result::Response;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kifu-audit/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Perform one request against `base_url` + `path`.
///
/// Never fails: connection errors and timeouts come back as status `0`
/// with an `{"error": ...}` body and empty raw text. HTTP error statuses
/// are returned as-is together with whatever the server sent.
pub async fn send(
    client: &Client,
    base_url: &str,
    method: Method,
    path: &str,
    token: Option<&str>,
    payload: Option<&Value>,
) -> Response {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);

    let mut request = client
        .request(method, &url)
        .header(ACCEPT, "application/json");
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        request = request.bearer_auth(token);
    }
    if let Some(payload) = payload {
        request = request.json(payload);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return failure(&url, &e),
    };

    let status = response.status().as_u16();
    let raw = match response.bytes().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => return failure(&url, &e),
    };

    Response {
        status,
        body: decode_body(&raw),
        raw,
    }
}

fn failure(url: &str, err: &reqwest::Error) -> Response {
    let message = report(err);
    log::warn!("Request to {url} failed: {message}");
    Response {
        status: 0,
        body: serde_json::json!({ "error": message }),
        raw: String::new(),
    }
}

fn decode_body(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
