use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DealflowError, Result};
use crate::types::LogLevel;

/// Top-level configuration for the Dealflow engine.
///
/// Loaded from `~/.dealflow/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealflowConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
}

impl DealflowConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DealflowConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DealflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the signal extractor endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout. Extraction past this bound yields an empty analysis.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// API key. Falls back to the `AI_API_KEY` environment variable if unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
            api_key: None,
        }
    }
}

/// Settings for action derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// Fallback offset for schedule actions whose date cannot be resolved.
    #[serde(default = "default_follow_up_fallback_hours")]
    pub follow_up_fallback_hours: i64,
}

fn default_follow_up_fallback_hours() -> i64 {
    24
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            follow_up_fallback_hours: default_follow_up_fallback_hours(),
        }
    }
}
