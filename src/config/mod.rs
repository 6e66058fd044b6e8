// * Pipeline configuration
// * Fixed thresholds live in `constants`; runtime settings are grouped in PipelineConfig.

pub mod constants;

use crate::refinery::category::Category;
use constants::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime settings shared by every extraction strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Page GET timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Per-hop HEAD timeout in seconds
    pub resolve_timeout_secs: u64,
    /// Redirect cap for short link expansion
    pub max_redirects: usize,
    /// Hosted AI extraction endpoint; the `ai` strategy is unavailable without it
    pub ai_endpoint: Option<String>,
    /// Optional bearer token for the AI endpoint
    pub ai_api_key: Option<String>,
    /// AI call timeout in seconds
    pub ai_timeout_secs: u64,
    /// Known deal categories used for inference
    pub categories: Vec<Category>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            resolve_timeout_secs: RESOLVE_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECTS,
            ai_endpoint: None,
            ai_api_key: None,
            ai_timeout_secs: AI_TIMEOUT_SECS,
            categories: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Builds a config from defaults overlaid with `DEAL_FLOW_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // * Split out so tests can feed variables without touching the process environment
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENV_AI_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.ai_endpoint = Some(endpoint.trim().to_string());
        }

        if let Some(key) = lookup(ENV_AI_API_KEY).filter(|v| !v.trim().is_empty()) {
            config.ai_api_key = Some(key.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT) {
            config.fetch_timeout_secs = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_FETCH_TIMEOUT.to_string(),
                        value: raw,
                    })
                }
            };
        }

        if let Some(path) = lookup(ENV_CATEGORIES_FILE).filter(|v| !v.trim().is_empty()) {
            config.categories = Self::load_categories(path.trim())?;
        }

        Ok(config)
    }

    /// Reads a JSON array of `{ "id": ..., "name": ... }` category records
    pub fn load_categories(path: impl AsRef<Path>) -> Result<Vec<Category>, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_redirects, 5);
        assert!(config.ai_endpoint.is_none());
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (ENV_AI_ENDPOINT, " https://ai.example.com/extract "),
            (ENV_AI_API_KEY, "secret"),
            (ENV_FETCH_TIMEOUT, "3"),
        ]))
        .unwrap();

        assert_eq!(config.ai_endpoint.as_deref(), Some("https://ai.example.com/extract"));
        assert_eq!(config.ai_api_key.as_deref(), Some("secret"));
        assert_eq!(config.fetch_timeout_secs, 3);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let result = PipelineConfig::from_lookup(lookup_from(&[(ENV_FETCH_TIMEOUT, "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = PipelineConfig::from_lookup(lookup_from(&[(ENV_FETCH_TIMEOUT, "0")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_categories_from_file() {
        let path = std::env::temp_dir().join(format!("deal_flow_categories_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"id": "c1", "name": "Mobile Phones"}, {"id": "c2", "name": "Laptops"}]"#,
        )
        .unwrap();

        let categories = PipelineConfig::load_categories(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Mobile Phones");
        assert_eq!(categories[1].id, "c2");
    }

    #[test]
    fn test_missing_categories_file() {
        let result = PipelineConfig::load_categories("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
