use chrono::{Local, NaiveDate};
use reqwest::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Post,
}

impl From<ProbeMethod> for Method {
    fn from(method: ProbeMethod) -> Self {
        match method {
            ProbeMethod::Get => Method::GET,
            ProbeMethod::Post => Method::POST,
        }
    }
}

/// One read endpoint captured in every snapshot.
///
/// `path` may contain `{today}` (local date, `YYYY-MM-DD`) and
/// `{timezone}`, which are filled in right before the request is sent.
#[derive(Debug, Clone, Copy)]
pub struct ProbeDefinition {
    pub name: &'static str,
    pub method: ProbeMethod,
    pub path: &'static str,
    pub requires_auth: bool,
}

const fn get(name: &'static str, path: &'static str, requires_auth: bool) -> ProbeDefinition {
    ProbeDefinition {
        name,
        method: ProbeMethod::Get,
        path,
        requires_auth,
    }
}

pub const PROBES: &[ProbeDefinition] = &[
    get("health", "/health", false),
    get("me", "/api/v1/users/me", true),
    get("subscription", "/api/v1/users/me/subscription", true),
    get("trade_summary", "/api/v1/trades/summary", true),
    get("trades_latest", "/api/v1/trades?page=1&limit=20", true),
    get("bubbles_latest", "/api/v1/bubbles?page=1&limit=20&sort=desc", true),
    get("review_stats", "/api/v1/review/stats?period=30d", true),
    get(
        "review_accuracy",
        "/api/v1/review/accuracy?period=30d&outcome_period=1h",
        true,
    ),
    get(
        "review_calendar",
        "/api/v1/review/calendar?from={today}&to={today}",
        true,
    ),
    get("portfolio_timeline", "/api/v1/portfolio/timeline?limit=50", true),
    get(
        "portfolio_positions",
        "/api/v1/portfolio/positions?status=all&limit=200",
        true,
    ),
    get("manual_positions", "/api/v1/manual-positions?status=all", true),
    get("notes", "/api/v1/notes?page=1&limit=20", true),
    get("safety_today", "/api/v1/safety/today", true),
    get(
        "guided_review_today",
        "/api/v1/guided-reviews/today?timezone={timezone}",
        true,
    ),
    get("alerts", "/api/v1/alerts?limit=10", true),
    get(
        "klines_btc_1d",
        "/api/v1/market/klines?symbol=BTCUSDT&interval=1d&limit=5",
        true,
    ),
];

/// Values substituted into probe paths.
#[derive(Debug, Clone)]
pub struct ProbeVars {
    pub today: NaiveDate,
    pub timezone: String,
}

impl ProbeVars {
    pub fn now(timezone: impl Into<String>) -> Self {
        ProbeVars {
            today: Local::now().date_naive(),
            timezone: timezone.into(),
        }
    }
}

impl ProbeDefinition {
    pub fn resolve_path(&self, vars: &ProbeVars) -> String {
        self.path
            .replace("{today}", &vars.today.format("%Y-%m-%d").to_string())
            .replace("{timezone}", &vars.timezone)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn vars() -> ProbeVars {
        ProbeVars {
            today: NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date"),
            timezone: "Asia/Seoul".to_string(),
        }
    }

    #[test]
    fn test_probe_names_are_unique() {
        let names: HashSet<_> = PROBES.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PROBES.len());
    }

    #[test]
    fn test_only_health_is_anonymous() {
        let anonymous: Vec<_> = PROBES
            .iter()
            .filter(|p| !p.requires_auth)
            .map(|p| p.name)
            .collect();
        assert_eq!(anonymous, vec!["health"]);
    }

    #[test]
    fn test_calendar_path_gets_todays_date() {
        let calendar = PROBES
            .iter()
            .find(|p| p.name == "review_calendar")
            .expect("calendar probe");
        assert_eq!(
            calendar.resolve_path(&vars()),
            "/api/v1/review/calendar?from=2026-03-07&to=2026-03-07"
        );
    }

    #[test]
    fn test_guided_review_path_gets_timezone() {
        let guided = PROBES
            .iter()
            .find(|p| p.name == "guided_review_today")
            .expect("guided review probe");
        assert_eq!(
            guided.resolve_path(&vars()),
            "/api/v1/guided-reviews/today?timezone=Asia/Seoul"
        );
    }

    #[test]
    fn test_static_paths_are_untouched() {
        for probe in PROBES.iter().filter(|p| !p.path.contains('{')) {
            assert_eq!(probe.resolve_path(&vars()), probe.path);
        }
    }
}
