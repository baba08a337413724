use serde_json::Value;

/// Rendered in place of any field that is absent, null, or not where the
/// path expects it.
pub const PLACEHOLDER: &str = "-";

/// Follow `path` through nested JSON objects.
///
/// Stops with `None` as soon as the current value is not an object, the key
/// is missing, or the value found is `null`.
pub fn dig<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let found = path
        .iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))?;
    (!found.is_null()).then_some(found)
}

/// [`dig`] with a fallback.
pub fn dig_or<'a>(value: &'a Value, path: &[&str], default: &'a Value) -> &'a Value {
    dig(value, path).unwrap_or(default)
}

type Path = &'static [&'static str];

/// How a summary line is derived from one probe entry.
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// The recorded HTTP status of the probe.
    Status,
    /// First path under the body that yields a value.
    Scalar(&'static [Path]),
    /// Length of a list under the body.
    Count(Path),
    /// An explicit count field, else the length of a list.
    CountOr(Path, Path),
    /// Two body values joined as `a/b`.
    Ratio(Path, Path),
    /// A key of the first element of a list. The line is left out when the
    /// list is absent or empty.
    FirstItem(Path, &'static str),
}

#[derive(Debug, Clone, Copy)]
struct Field {
    label: &'static str,
    probe: &'static str,
    extract: Extract,
}

const fn field(label: &'static str, probe: &'static str, extract: Extract) -> Field {
    Field {
        label,
        probe,
        extract,
    }
}

const FIELDS: &[Field] = &[
    field("health_status", "health", Extract::Status),
    field("user_id", "me", Extract::Scalar(&[&["id"]])),
    field("ai_allowlisted", "me", Extract::Scalar(&[&["ai_allowlisted"]])),
    field(
        "ai_quota",
        "subscription",
        Extract::Ratio(&["ai_quota_remaining"], &["ai_quota_limit"]),
    ),
    field(
        "trade_total",
        "trade_summary",
        Extract::Scalar(&[&["totals", "total_trades"], &["total_trades"]]),
    ),
    field("trades_latest_count", "trades_latest", Extract::Count(&["items"])),
    field(
        "trades_latest_first_id",
        "trades_latest",
        Extract::FirstItem(&["items"], "id"),
    ),
    field("bubbles_total", "bubbles_latest", Extract::Scalar(&[&["total"]])),
    field("bubbles_latest_count", "bubbles_latest", Extract::Count(&["items"])),
    field(
        "review.total_bubbles",
        "review_stats",
        Extract::Scalar(&[&["total_bubbles"]]),
    ),
    field(
        "review.win_rate",
        "review_stats",
        Extract::Scalar(&[&["overall", "win_rate"]]),
    ),
    field(
        "review.total_pnl",
        "review_stats",
        Extract::Scalar(&[&["overall", "total_pnl"]]),
    ),
    field(
        "portfolio.positions_count",
        "portfolio_positions",
        Extract::CountOr(&["count"], &["positions"]),
    ),
    field("timeline_count", "portfolio_timeline", Extract::Count(&["items"])),
    field("alerts_status", "alerts", Extract::Status),
    field("guided_review_status", "guided_review_today", Extract::Status),
];

/// Where the snapshot being summarized came from.
#[derive(Debug, Clone, Copy)]
pub enum SummarySource<'a> {
    /// Straight after a probe run, with the account that ran it.
    Live { email: &'a str },
    /// Reloaded from a saved snapshot file.
    Saved,
}

impl SummarySource<'_> {
    fn markers(&self) -> (&'static str, &'static str) {
        match self {
            SummarySource::Live { .. } => ("=== KIFU_AUDIT_SUMMARY ===", "=== KIFU_AUDIT_SUMMARY_END ==="),
            SummarySource::Saved => ("=== KIFU_AUDIT_BRIEF ===", "=== KIFU_AUDIT_BRIEF_END ==="),
        }
    }
}

/// Flatten a snapshot document into `label: value` lines.
///
/// Works on any JSON value: fields that cannot be found degrade to
/// [`PLACEHOLDER`]. The output depends only on `snapshot` and `source`.
pub fn summarize(snapshot: &Value, source: SummarySource<'_>) -> Vec<String> {
    let mut lines = vec![
        line("generated_at", render(dig(snapshot, &["generated_at"]))),
        line("api", render(dig(snapshot, &["api"]))),
    ];
    if let SummarySource::Live { email } = source {
        lines.push(line("user", email.to_string()));
    }

    for field in FIELDS {
        let entry = dig(snapshot, &["results", field.probe]);
        if let Some(value) = extract(entry, field.extract) {
            lines.push(line(field.label, value));
        }
    }
    lines
}

/// [`summarize`] framed by the start/end markers for `source`.
pub fn render_report(snapshot: &Value, source: SummarySource<'_>) -> String {
    let (start, end) = source.markers();
    let mut out = vec![start.to_string()];
    out.extend(summarize(snapshot, source));
    out.push(end.to_string());
    out.join("\n")
}

fn line(label: &str, value: String) -> String {
    format!("{label}: {value}")
}

fn extract(entry: Option<&Value>, how: Extract) -> Option<String> {
    let body = entry.and_then(|entry| dig(entry, &["body"]));
    let at = |path: Path| body.and_then(|body| dig(body, path));

    let value = match how {
        Extract::Status => render(entry.and_then(|entry| dig(entry, &["status"]))),
        Extract::Scalar(paths) => render(paths.iter().find_map(|&path| at(path))),
        Extract::Count(path) => count(at(path)),
        Extract::CountOr(count_path, list_path) => match at(count_path) {
            Some(value) => render(Some(value)),
            None => count(at(list_path)),
        },
        Extract::Ratio(left, right) => format!("{}/{}", render(at(left)), render(at(right))),
        Extract::FirstItem(path, key) => {
            let first = at(path)?.as_array()?.first()?;
            render(dig(first, &[key]))
        }
    };
    Some(value)
}

fn count(value: Option<&Value>) -> String {
    match value.and_then(Value::as_array) {
        Some(items) => items.len().to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
