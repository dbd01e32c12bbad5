//! Application configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted backend (REST + auth live under it)
    pub base_url: String,

    /// Project API key sent with every request
    pub api_key: String,

    /// Websocket URL of the change-feed transport; realtime is disabled
    /// when absent
    #[serde(default)]
    pub realtime_url: Option<String>,
}

/// Change-feed buffering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Broadcast channel capacity before slow subscribers lag
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    1024
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:54321".to_string(),
                api_key: "test-key".to_string(),
                realtime_url: None,
            },
            feed: FeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn yaml_roundtrip() {
        let config = AppConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.feed.capacity, 1024);
    }

    #[test]
    fn missing_optional_sections_default() {
        let yaml = r#"
backend:
  base_url: "https://ops.example.com"
  api_key: "abc123"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert!(config.backend.realtime_url.is_none());
        assert_eq!(config.feed.capacity, 1024);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "backend:\n  base_url: \"https://ops.example.com\"\n  api_key: \"k\"\n"
        )
        .unwrap();
        let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.backend.api_key, "k");
    }
}
