use std::collections::BTreeMap;
use std::time::Instant;

use reqwest::Client;

use super::prelude::*;

fn to_fixed_width(input: &str, width: usize) -> String {
    use unicode_truncate::UnicodeTruncateStr;

    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

/// Run every probe in `probes` against `base_url` and collect the results
/// keyed by probe name.
///
/// Each probe runs in its own task. The token is only attached to probes
/// that require auth. A failing probe never stops the others, and every
/// probe name ends up in the returned map.
pub async fn probe_all(
    client: &Client,
    base_url: &str,
    token: &str,
    probes: &[ProbeDefinition],
    vars: &ProbeVars,
) -> BTreeMap<String, ProbeResult> {
    let name_width = probes.iter().map(|p| p.name.len()).max().unwrap_or(10);
    let mut handles = Vec::with_capacity(probes.len());

    for probe in probes {
        let client = client.clone();
        let base_url = base_url.to_string();
        let token = probe.requires_auth.then(|| token.to_string());
        let path = probe.resolve_path(vars);
        let name = probe.name;
        let method = probe.method;

        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let response = send(
                &client,
                &base_url,
                method.into(),
                &path,
                token.as_deref(),
                None,
            )
            .await;
            let elapsed = start.elapsed().as_secs_f64();

            let label = to_fixed_width(name, name_width);
            if response.status == 0 {
                log::warn!("[{label}] ❌ {path}: no response after {:.2}ms", elapsed * 1000.0);
            } else {
                log::info!(
                    "[{label}] {path}: HTTP {}, Elapsed: {:.2}ms",
                    response.status,
                    elapsed * 1000.0
                );
            }

            ProbeResult::from(response)
        });

        handles.push((name, handle));
    }

    let mut results = BTreeMap::new();
    for (name, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Probe task for {name} did not complete: {e}");
                ProbeResult::transport_failure(format!("probe task failed: {e}"))
            }
        };
        results.insert(name.to_string(), result);
    }
    results
}
