use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_ALERT_MS: u64 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_FILE: &str = ".resume-analyzer/session.json";

/// Client configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub alert_duration: Duration,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            api_url: lookup("RESUME_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            alert_duration: Duration::from_millis(parse_or(
                &lookup,
                "RESUME_ALERT_MS",
                DEFAULT_ALERT_MS,
            )?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "RESUME_REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            session_file: lookup("RESUME_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.alert_duration, Duration::from_millis(3000));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.session_file, PathBuf::from(".resume-analyzer/session.json"));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("RESUME_API_URL", "https://resumes.example.com"),
            ("RESUME_ALERT_MS", "5000"),
            ("RESUME_REQUEST_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://resumes.example.com");
        assert_eq!(config.alert_duration, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = config_from(&[("RESUME_ALERT_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("RESUME_ALERT_MS"));
    }
}
