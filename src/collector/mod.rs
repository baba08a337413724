use reqwest::Client;

use crate::auth::login;
use crate::config::app_config::AppConfig;
use crate::error::{AuditError, AuthError};
use crate::http_probe::prelude::*;
use crate::snapshot::{self, Snapshot};
use crate::summary::{SummarySource, render_report};

pub const START_MARKER: &str = "=== KIFU_AUDIT_START ===";
pub const END_MARKER: &str = "=== KIFU_AUDIT_END ===";

/// What the collector prints, and whether the run counts as a success.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub success: bool,
}

/// Log in and capture every registered probe into one snapshot.
pub async fn collect(client: &Client, config: &AppConfig) -> Result<Snapshot, AuthError> {
    let token = login(client, &config.api, &config.email, &config.password).await?;
    let vars = ProbeVars::now(config.timezone.clone());
    let results = probe_all(client, &config.api, &token, PROBES, &vars).await;
    Ok(snapshot::assemble(&config.api, results))
}

/// One full collector run.
///
/// A login failure is not an `Err`: it still yields an error-shaped snapshot
/// (saved when requested) and output, with `success` unset. `Err` is kept
/// for failures to build the client or to write the snapshot.
pub async fn run(config: &AppConfig) -> Result<RunOutput, AuditError> {
    let client = build_client(config.timeout)?;

    let snapshot = match collect(&client, config).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("Authentication failed: {e}");
            let snapshot = snapshot::failed(&config.api, e.to_string());
            save(&snapshot, config)?;
            return Ok(RunOutput {
                stdout: framed(&snapshot.to_compact_string()?),
                success: false,
            });
        }
    };

    save(&snapshot, config)?;

    let stdout = if config.summary {
        render_report(
            &snapshot.to_json(),
            SummarySource::Live {
                email: &config.email,
            },
        )
    } else {
        framed(&snapshot.to_pretty_string()?)
    };

    Ok(RunOutput {
        stdout,
        success: true,
    })
}

fn save(snapshot: &Snapshot, config: &AppConfig) -> Result<(), AuditError> {
    if let Some(path) = &config.save {
        snapshot::persist(snapshot, path)?;
    }
    Ok(())
}

fn framed(json: &str) -> String {
    format!("{START_MARKER}\n{json}\n{END_MARKER}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(api: String, save: Option<PathBuf>, summary: bool) -> AppConfig {
        AppConfig {
            api,
            email: "user@kifu.local".to_string(),
            password: "pass".to_string(),
            timeout: Duration::from_secs(5),
            timezone: "Asia/Seoul".to_string(),
            summary,
            save,
        }
    }

    async fn service() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/me/subscription"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ai_quota_remaining": 3, "ai_quota_limit": 10})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/trades"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": 42}]})))
            .mount(&server)
            .await;
        server
    }

    fn unframe(stdout: &str) -> Value {
        let inner = stdout
            .strip_prefix(&format!("{START_MARKER}\n"))
            .and_then(|s| s.strip_suffix(&format!("\n{END_MARKER}")))
            .expect("framed output");
        serde_json::from_str(inner).expect("json between markers")
    }

    #[tokio::test]
    async fn test_full_snapshot_is_printed_and_saved() {
        let server = service().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let save = dir.path().join("audit.json");

        let output = run(&config(server.uri(), Some(save.clone()), false))
            .await
            .expect("run");

        assert!(output.success);
        let printed = unframe(&output.stdout);
        assert_eq!(printed["api"], server.uri());
        let results = printed["results"].as_object().expect("results");
        assert_eq!(results.len(), PROBES.len());
        assert_eq!(printed["results"]["subscription"]["body"]["ai_quota_limit"], 10);
        assert_eq!(printed["results"]["alerts"]["status"], 404);

        let saved = snapshot::load(&save).expect("saved snapshot");
        assert_eq!(saved, printed);
    }

    #[tokio::test]
    async fn test_summary_mode_prints_live_summary() {
        let server = service().await;

        let output = run(&config(server.uri(), None, true)).await.expect("run");

        assert!(output.success);
        assert!(output.stdout.starts_with("=== KIFU_AUDIT_SUMMARY ==="));
        assert!(output.stdout.contains("user: user@kifu.local"));
        assert!(output.stdout.contains("health_status: 200"));
        assert!(output.stdout.contains("ai_quota: 3/10"));
        assert!(output.stdout.contains("trades_latest_count: 1"));
        assert!(output.stdout.contains("trades_latest_first_id: 42"));
        assert!(output.stdout.ends_with("=== KIFU_AUDIT_SUMMARY_END ==="));
    }

    #[tokio::test]
    async fn test_auth_failure_leaves_error_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": "x"})))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().expect("tempdir");
        let save = dir.path().join("audit.json");

        let output = run(&config(server.uri(), Some(save.clone()), true))
            .await
            .expect("run");

        assert!(!output.success);
        let printed = unframe(&output.stdout);
        assert_eq!(printed["error"], "Login response did not include access_token");
        assert!(printed.get("results").is_none());

        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&save).expect("read")).expect("json");
        assert_eq!(saved["error"], printed["error"]);
        assert!(matches!(
            snapshot::load(&save),
            Err(crate::error::InputError::Invalid(_))
        ));

        // Probing never started.
        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_save_path_is_an_error() {
        let server = service().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let save = dir.path().join("missing-dir").join("audit.json");

        let result = run(&config(server.uri(), Some(save), false)).await;

        assert!(matches!(result, Err(AuditError::Persist(_))));
    }
}
