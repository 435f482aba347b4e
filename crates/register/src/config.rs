//! Register configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TILL_DATABASE_URL` - `SQLite` connection string (default: `sqlite://till.db?mode=rwc`)
//! - `TILL_CURRENCY_SYMBOL` - Symbol printed before amounts (default: `₹`)
//! - `OCR_BASE_URL` - Base URL of the menu OCR service
//! - `OCR_TIMEOUT_SECS` - Request timeout for OCR uploads (default: 60)
//! - `OCR_API_KEY` - Bearer token for the OCR service

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use till_core::DEFAULT_CURRENCY_SYMBOL;
use url::Url;

const DEFAULT_DATABASE_URL: &str = "sqlite://till.db?mode=rwc";
const DEFAULT_OCR_BASE_URL: &str = "https://backend-for-pos.onrender.com/";
const DEFAULT_OCR_TIMEOUT_SECS: &str = "60";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Register configuration.
#[derive(Debug, Clone)]
pub struct RegisterConfig {
    /// `SQLite` database URL
    pub database_url: String,
    /// Currency symbol for display
    pub currency_symbol: String,
    /// Menu OCR service
    pub ocr: OcrConfig,
}

/// Menu OCR service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OcrConfig {
    /// Base URL; the upload endpoint is resolved against it
    pub base_url: Url,
    /// Connect and read timeout
    pub timeout: Duration,
    /// Optional bearer token
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RegisterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_env_or_default(&lookup, "TILL_DATABASE_URL", DEFAULT_DATABASE_URL);
        let currency_symbol =
            get_env_or_default(&lookup, "TILL_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL);

        Ok(Self {
            database_url,
            currency_symbol,
            ocr: OcrConfig::from_lookup(&lookup)?,
        })
    }
}

impl OcrConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_env_or_default(lookup, "OCR_BASE_URL", DEFAULT_OCR_BASE_URL);
        let base_url = Url::parse(&with_trailing_slash(&raw_url))
            .map_err(|e| ConfigError::InvalidEnvVar("OCR_BASE_URL".to_string(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "OCR_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let timeout_secs = get_env_or_default(lookup, "OCR_TIMEOUT_SECS", DEFAULT_OCR_TIMEOUT_SECS)
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "OCR_TIMEOUT_SECS".to_string(),
                    "must be a positive number of seconds".to_string(),
                )
            })?;

        let api_key = get_optional_env(lookup, "OCR_API_KEY").map(SecretString::from);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            api_key,
        })
    }
}

/// Get an optional variable, treating blank values as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

// `Url::join` drops the last path segment unless the base ends with '/'
fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RegisterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.ocr.base_url.as_str(), DEFAULT_OCR_BASE_URL);
        assert_eq!(config.ocr.timeout, Duration::from_secs(60));
        assert!(config.ocr.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = RegisterConfig::from_lookup(lookup(&[
            ("TILL_DATABASE_URL", "sqlite::memory:"),
            ("TILL_CURRENCY_SYMBOL", "$"),
            ("OCR_BASE_URL", "http://localhost:8000/api"),
            ("OCR_TIMEOUT_SECS", "5"),
            ("OCR_API_KEY", "sk-local-test"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.ocr.base_url.as_str(), "http://localhost:8000/api/");
        assert_eq!(config.ocr.timeout, Duration::from_secs(5));
        assert_eq!(
            config.ocr.api_key.as_ref().unwrap().expose_secret(),
            "sk-local-test"
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            RegisterConfig::from_lookup(lookup(&[("TILL_CURRENCY_SYMBOL", "  "), ("OCR_API_KEY", "")]))
                .unwrap();
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.ocr.api_key.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = RegisterConfig::from_lookup(lookup(&[("OCR_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("OCR_TIMEOUT_SECS"));

        let err = RegisterConfig::from_lookup(lookup(&[("OCR_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("OCR_TIMEOUT_SECS"));

        let err = RegisterConfig::from_lookup(lookup(&[("OCR_BASE_URL", "not a url")])).unwrap_err();
        assert!(err.to_string().contains("OCR_BASE_URL"));

        let err =
            RegisterConfig::from_lookup(lookup(&[("OCR_BASE_URL", "ftp://scanner.local/")])).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            RegisterConfig::from_lookup(lookup(&[("OCR_API_KEY", "sk-very-private")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-private"));
        assert!(debug.contains("[REDACTED]"));
    }
}
