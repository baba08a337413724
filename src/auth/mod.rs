use reqwest::{Client, Method};
use serde_json::json;

use crate::error::AuthError;
use crate::http_probe::prelude::send;

pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Exchange an email/password pair for a bearer token.
///
/// One attempt, no refresh: the token lives for the duration of the run.
pub async fn login(
    client: &Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let payload = json!({ "email": email, "password": password });
    let response = send(client, base_url, Method::POST, LOGIN_PATH, None, Some(&payload)).await;

    if response.status != 200 {
        return Err(AuthError::Rejected {
            status: response.status,
            body: match response.body {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            },
        });
    }

    let token = response
        .body
        .as_object()
        .and_then(|body| body.get("access_token"))
        .and_then(|token| token.as_str())
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    log::info!("Authenticated against {base_url} as {email}");
    Ok(token.to_string())
}
