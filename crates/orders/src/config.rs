//! Sync configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PETCARE_API_URL` - Backend API root (default: `http://localhost:5000/api`)
//! - `PETCARE_DATA_DIR` - Directory for the local order cache (default: `.petcare`)
//! - `PETCARE_HTTP_TIMEOUT_SECS` - Per-request timeout, 1-60 (default: 8)
//! - `PETCARE_USER_EMAIL` - Email whose orders are synced from the backend

use std::path::PathBuf;
use std::time::Duration;

use petcare_core::Email;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_DATA_DIR: &str = ".petcare";
const DEFAULT_TIMEOUT_SECS: u64 = 8;
const MAX_TIMEOUT_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where orders are cached and where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Backend API root; `health` and `orders/user/{email}` hang off it.
    pub api_url: Url,
    /// Directory holding the local key-value files.
    pub data_dir: PathBuf,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
    /// Whose orders to sync. Without one, only the local cache is used.
    pub user_email: Option<Email>,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = get("PETCARE_API_URL")
            .map_or_else(|| parse_api_url(DEFAULT_API_URL), |raw| parse_api_url(&raw))?;
        let data_dir = get("PETCARE_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let request_timeout = get("PETCARE_HTTP_TIMEOUT_SECS")
            .map_or(Ok(DEFAULT_TIMEOUT_SECS), |raw| parse_timeout_secs(&raw))
            .map(Duration::from_secs)?;
        let user_email = get("PETCARE_USER_EMAIL")
            .map(|raw| {
                Email::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("PETCARE_USER_EMAIL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            api_url,
            data_dir,
            request_timeout,
            user_email,
        })
    }

    /// The configured user email, or an error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no email is configured.
    pub fn require_email(&self) -> Result<&Email, ConfigError> {
        self.user_email
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PETCARE_USER_EMAIL".to_string()))
    }
}

/// Parse a backend API root. Only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unparseable or non-HTTP URLs.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("PETCARE_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::InvalidEnvVar("PETCARE_HTTP_TIMEOUT_SECS".to_string(), reason)
    };

    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| invalid(e.to_string()))?;
    if (1..=MAX_TIMEOUT_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(invalid(format!("must be between 1 and {MAX_TIMEOUT_SECS}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SyncConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SyncConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(8));
        assert_eq!(config.data_dir, PathBuf::from(".petcare"));
        assert!(config.user_email.is_none());
        assert!(config.require_email().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PETCARE_API_URL", "https://api.petcare.test/v1/"),
            ("PETCARE_DATA_DIR", "/var/lib/petcare"),
            ("PETCARE_HTTP_TIMEOUT_SECS", "5"),
            ("PETCARE_USER_EMAIL", "owner@example.com"),
        ])
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://api.petcare.test/v1/");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/petcare"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.require_email().unwrap().as_str(), "owner@example.com");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("PETCARE_USER_EMAIL", "  "), ("PETCARE_API_URL", "")]).unwrap();
        assert!(config.user_email.is_none());
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("PETCARE_API_URL", "ftp://files.example.com"),
            ("PETCARE_API_URL", "not a url"),
            ("PETCARE_HTTP_TIMEOUT_SECS", "0"),
            ("PETCARE_HTTP_TIMEOUT_SECS", "600"),
            ("PETCARE_HTTP_TIMEOUT_SECS", "soon"),
            ("PETCARE_USER_EMAIL", "nobody"),
        ] {
            assert!(
                matches!(load(&[(key, value)]), Err(ConfigError::InvalidEnvVar(ref k, _)) if k == key),
                "{key}={value}"
            );
        }
    }
}
