use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use url::Url;

use super::model::FileConfig;
use crate::error::ConfigError;
use crate::http_probe::transport::DEFAULT_TIMEOUT;

pub const DEFAULT_API: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
pub const DEFAULT_SNAPSHOT_PATH: &str = "/tmp/kifu-audit.json";

/// Collect a compact cross-page data snapshot from the authenticated Kifu APIs.
#[derive(Debug, Default, Parser)]
#[command(name = "kifu-audit", author, version, about, long_about = None)]
pub struct CollectorArgs {
    /// Base URL of the Kifu API
    #[arg(long, env = "KIFU_API_URL")]
    pub api: Option<String>,

    /// Account email used to log in
    #[arg(long, env = "KIFU_AUDIT_EMAIL")]
    pub email: Option<String>,

    /// Account password used to log in
    #[arg(long, env = "KIFU_AUDIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print only a compact summary
    #[arg(long)]
    pub summary: bool,

    /// Save the full JSON snapshot to FILE
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// YAML file with defaults for api, email, timeout and timezone
    #[arg(long, env = "KIFU_AUDIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "KIFU_AUDIT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Timezone passed to the guided-review endpoint
    #[arg(long, env = "KIFU_AUDIT_TIMEZONE")]
    pub timezone: Option<String>,
}

/// Print the brief of a saved kifu-audit snapshot.
#[derive(Debug, Parser)]
#[command(name = "kifu-audit-brief", author, version, about, long_about = None)]
pub struct BriefArgs {
    /// Snapshot file written by `kifu-audit --save`
    #[arg(default_value = DEFAULT_SNAPSHOT_PATH)]
    pub file: PathBuf,
}

pub struct AppConfig {
    pub api: String,
    pub email: String,
    pub password: String,
    pub timeout: Duration,
    pub timezone: String,
    pub summary: bool,
    pub save: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api", &self.api)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("timezone", &self.timezone)
            .field("summary", &self.summary)
            .field("save", &self.save)
            .finish()
    }
}

/// Resolve the collector configuration.
///
/// Flags and environment variables (already merged by clap) take precedence
/// over the optional YAML file named by `--config` / `KIFU_AUDIT_CONFIG`,
/// which takes precedence over the built-in defaults. Empty values count
/// as unset.
pub fn load_config(args: CollectorArgs) -> Result<AppConfig, ConfigError> {
    let file = match &args.config {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let email = non_empty(args.email).or(non_empty(file.email));
    let password = non_empty(args.password);
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ConfigError::MissingCredentials);
    };

    let api = non_empty(args.api)
        .or(non_empty(file.api))
        .unwrap_or_else(|| DEFAULT_API.to_string());
    validate_api(&api)?;

    let timeout = args
        .timeout_secs
        .or(file.timeout_seconds)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    let timezone = non_empty(args.timezone)
        .or(non_empty(file.guided_review_timezone))
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

    log::info!("Using API base URL: {api}");

    Ok(AppConfig {
        api,
        email,
        password,
        timeout,
        timezone,
        summary: args.summary,
        save: args.save,
    })
}

pub fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The API base URL must be an absolute http(s) URL with a host.
pub fn validate_api(api: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidApiUrl {
        url: api.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(api).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
