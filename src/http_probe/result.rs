use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized outcome of a single HTTP call.
///
/// `status` is `0` when the request never produced an HTTP response
/// (timeout, refused connection, protocol error). `body` is the decoded
/// JSON document, or the raw text as a JSON string when decoding fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
    pub raw: String,
}

/// What a snapshot records for one probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: u16,
    pub body: Value,
}

impl ProbeResult {
    pub fn transport_failure(message: impl Into<String>) -> Self {
        ProbeResult {
            status: 0,
            body: serde_json::json!({ "error": message.into() }),
        }
    }
}

impl From<Response> for ProbeResult {
    fn from(response: Response) -> Self {
        ProbeResult {
            status: response.status,
            body: response.body,
        }
    }
}
