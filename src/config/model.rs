use serde::Deserialize;

/// Optional YAML defaults for the collector.
///
/// Every key may be omitted; flags and environment variables win over
/// anything set here. Passwords are deliberately not accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base URL of the Kifu API, e.g. `http://127.0.0.1:8080`.
    pub api: Option<String>,

    /// Account used to log in.
    pub email: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_seconds: Option<u64>,

    /// IANA timezone sent to the guided-review endpoint.
    pub guided_review_timezone: Option<String>,
}
