use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::engine::DEFAULT_FOOTER;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub photo_fetch_timeout: Duration,
    pub report_footer: String,
    pub cv_margin_mm: f32,
    pub report_margin_mm: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: parse_or("PORT", &lookup, 8080)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            photo_fetch_timeout: Duration::from_secs(
                parse_or("PHOTO_FETCH_TIMEOUT_SECS", &lookup, 30)
                    .context("PHOTO_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            report_footer: lookup("REPORT_FOOTER").unwrap_or_else(|| DEFAULT_FOOTER.to_string()),
            cv_margin_mm: parse_or("CV_MARGIN_MM", &lookup, 20.0)
                .context("CV_MARGIN_MM must be a number")?,
            report_margin_mm: parse_or("REPORT_MARGIN_MM", &lookup, 15.0)
                .context("REPORT_MARGIN_MM must be a number")?,
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = make_config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.photo_fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.report_footer, DEFAULT_FOOTER);
        assert_eq!(config.cv_margin_mm, 20.0);
        assert_eq!(config.report_margin_mm, 15.0);
    }

    #[test]
    fn test_overrides() {
        let config = make_config(&[
            ("PORT", "3000"),
            ("PHOTO_FETCH_TIMEOUT_SECS", "5"),
            ("REPORT_FOOTER", ""),
            ("CV_MARGIN_MM", "12.5"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.photo_fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.report_footer, "");
        assert_eq!(config.cv_margin_mm, 12.5);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = make_config(&[("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }
}
