//! Runtime configuration from environment variables

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub profile_path: PathBuf,
    pub lookup_timeout: Duration,
    pub wikipedia_url: String,
    pub web_search_url: String,
    pub session_cookie: String,
}

impl AppConfig {
    /// Read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = parse_or(&var, "ZANA_BIND", "an IP address", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(&var, "ZANA_PORT", "a port number", 8000)?;
        let timeout_secs: u64 =
            parse_or(&var, "ZANA_LOOKUP_TIMEOUT_SECS", "a whole number of seconds", 6)?;

        let session_cookie =
            var("ZANA_SESSION_COOKIE").unwrap_or_else(|| "zana_session".to_string());
        if !is_cookie_name(&session_cookie) {
            return Err(ConfigError::Invalid {
                var: "ZANA_SESSION_COOKIE",
                expected: "a cookie name",
                value: session_cookie,
            });
        }

        Ok(Self {
            bind,
            port,
            profile_path: var("ZANA_PROFILE_PATH")
                .map_or_else(|| PathBuf::from("user_profile.json"), PathBuf::from),
            lookup_timeout: Duration::from_secs(timeout_secs),
            wikipedia_url: var("ZANA_WIKIPEDIA_URL")
                .unwrap_or_else(|| "https://en.wikipedia.org".to_string()),
            web_search_url: var("ZANA_WEB_SEARCH_URL")
                .unwrap_or_else(|| "https://api.duckduckgo.com".to_string()),
            session_cookie,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name,
            expected,
            value,
        }),
    }
}

/// RFC 6265 token characters
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind.to_string(), "0.0.0.0");
        assert_eq!(config.profile_path, PathBuf::from("user_profile.json"));
        assert_eq!(config.lookup_timeout, Duration::from_secs(6));
        assert_eq!(config.wikipedia_url, "https://en.wikipedia.org");
        assert_eq!(config.web_search_url, "https://api.duckduckgo.com");
        assert_eq!(config.session_cookie, "zana_session");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ZANA_PORT", "9001"),
            ("ZANA_BIND", "127.0.0.1"),
            ("ZANA_LOOKUP_TIMEOUT_SECS", " 2 "),
            ("ZANA_PROFILE_PATH", "/tmp/p.json"),
        ])
        .unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.bind.to_string(), "127.0.0.1");
        assert_eq!(config.lookup_timeout, Duration::from_secs(2));
        assert_eq!(config.profile_path, PathBuf::from("/tmp/p.json"));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert_eq!(
            config(&[("ZANA_PORT", "eighty")]),
            Err(ConfigError::Invalid {
                var: "ZANA_PORT",
                expected: "a port number",
                value: "eighty".to_string(),
            })
        );
        assert!(config(&[("ZANA_LOOKUP_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config(&[("ZANA_SESSION_COOKIE", "bad cookie")]).is_err());
        assert!(config(&[("ZANA_SESSION_COOKIE", "")]).is_err());
    }
}
