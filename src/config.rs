use std::{env, str::FromStr, time::Duration};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_DASHBOARD_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    /// `None` disables the periodic refresh.
    pub refresh_interval: Option<Duration>,
    pub dashboard_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            refresh_interval: Some(Duration::from_secs(DEFAULT_REFRESH_SECS)),
            dashboard_days: DEFAULT_DASHBOARD_DAYS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let refresh_secs = parse_or(&lookup, "REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_SECS);
        let backend_url = lookup("ATTENDANCE_BACKEND_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            backend_url,
            refresh_interval: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
            dashboard_days: parse_or(&lookup, "DASHBOARD_DAYS", DEFAULT_DASHBOARD_DAYS),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring invalid {key}={raw:?}");
                default
            }
        },
        None => default,
    }
}
