//! Process configuration, read once at start-up and handed to the clients.

use crate::disclosure::DART_BASE_URL;
use crate::error::{ExplainerError, Result};
use crate::llm::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
use log::warn;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "companies.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5003;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dart_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub dart_base_url: String,
    pub gemini_base_url: String,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dart_api_key: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            dart_base_url: DART_BASE_URL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ExplainerError::Config(format!("Invalid PORT '{}': {}", raw, e)))?,
            None => defaults.port,
        };

        Ok(Self {
            dart_api_key: get("OPEN_DART_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            dart_base_url: get("DART_BASE_URL").unwrap_or(defaults.dart_base_url),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            database_path: get("COMPANY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            host: get("HOST").unwrap_or(defaults.host),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Credentials are not checked per request; a missing key only earns a warning here.
    pub fn warn_missing_credentials(&self) -> usize {
        let mut missing = 0;
        if self.dart_api_key.is_none() {
            warn!("OPEN_DART_API_KEY is not set; disclosure requests will be rejected");
            missing += 1;
        }
        if self.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; explanation requests will fail");
            missing += 1;
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:5003");
        assert_eq!(config.warn_missing_credentials(), 2);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPEN_DART_API_KEY", "dart-key"),
            ("GEMINI_API_KEY", " gemini-key "),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("COMPANY_DB_PATH", "/tmp/corp.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.dart_api_key.as_deref(), Some("dart-key"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("gemini-key"));
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.database_path, PathBuf::from("/tmp/corp.db"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.warn_missing_credentials(), 0);
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[("OPEN_DART_API_KEY", "   ")])).unwrap();
        assert!(config.dart_api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(ExplainerError::Config(_))));
    }
}
