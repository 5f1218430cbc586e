//! Configuration for the capture engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::capture::core::errors::{CaptureError, CaptureResult};

/// Top-level configuration for the capture engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Storage settings.
    pub storage: StorageConfig,
    /// Completion model settings.
    pub llm: LlmConfig,
    /// Fuzzy matcher settings.
    pub matcher: MatcherConfig,
}

impl AgentConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.storage.items_table.is_empty()
            || !self
                .storage
                .items_table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CaptureError::InvalidConfig(
                "storage.items_table must be a non-empty identifier".to_string(),
            ));
        }

        if self.storage.timeout_secs == 0 {
            return Err(CaptureError::InvalidConfig(
                "storage.timeout_secs must be > 0".to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(CaptureError::InvalidConfig(
                "llm.timeout_secs must be > 0".to_string(),
            ));
        }

        if !(self.matcher.min_similarity > 0.0 && self.matcher.min_similarity <= 1.0) {
            return Err(CaptureError::InvalidConfig(
                "matcher.min_similarity must be in (0, 1]".to_string(),
            ));
        }

        if let Some(base_url) = &self.llm.base_url {
            Url::parse(base_url)?;
        }

        Ok(())
    }
}

/// Storage configuration for captured items.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
    /// Items table name.
    pub items_table: String,
    /// Bounded timeout for store calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("vietodo.sqlite"),
            items_table: "items".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Completion model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether the enrichment layer is consulted at all. The pipeline is
    /// fully functional without it.
    pub enabled: bool,
    /// Ollama completion model name.
    pub model: String,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Bounded timeout for each completion call, in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "mistral:7b-instruct-q8_0".to_string(),
            base_url: None,
            timeout_secs: 8,
        }
    }
}

/// Fuzzy matcher settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity for a candidate to be accepted.
    pub min_similarity: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_bad_table_name_rejected() {
        let mut config = AgentConfig::default();
        config.storage.items_table = "items; DROP TABLE items".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = AgentConfig::default();
        config.llm.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AgentConfig::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_range() {
        let mut config = AgentConfig::default();
        config.matcher.min_similarity = 1.5;
        assert!(config.validate().is_err());
    }
}
