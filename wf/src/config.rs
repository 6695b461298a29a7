//! Wayfarer configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main Wayfarer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text-generation provider configuration
    pub llm: LlmConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Prompt template configuration
    pub prompts: PromptsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        // Check provider API key environment variable is set
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Provider API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .wayfarer.yml
        let local_config = PathBuf::from(".wayfarer.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/wayfarer/wayfarer.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("wayfarer").join("wayfarer.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}",
                            user_config.display(),
                            e
                        );
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Text-generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: u32,

    /// Budget for one conversational turn, in milliseconds
    #[serde(rename = "chat-timeout-ms")]
    pub chat_timeout_ms: u64,

    /// Budget for one-shot full-itinerary generation, in milliseconds
    #[serde(rename = "bulk-timeout-ms")]
    pub bulk_timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(|_| {
            eyre::eyre!(
                "Provider API key not found. Set the {} environment variable.",
                self.api_key_env
            )
        })
    }

    /// Per-request budget for conversational turns
    pub fn chat_budget(&self) -> Duration {
        Duration::from_millis(self.chat_timeout_ms)
    }

    /// Per-request budget for bulk generation
    pub fn bulk_budget(&self) -> Duration {
        Duration::from_millis(self.bulk_timeout_ms)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_output_tokens: 8192,
            chat_timeout_ms: 30_000,
            bulk_timeout_ms: 90_000,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the trip database
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

impl StorageConfig {
    /// Path of the SQLite trip database
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("itinerary.db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/wayfarer on Linux)
        let data_dir = dirs::data_dir()
            .map(|d| d.join("wayfarer"))
            .unwrap_or_else(|| PathBuf::from(".wayfarer"))
            .to_string_lossy()
            .into_owned();

        Self { data_dir }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Extra override directory searched before `.wayfarer/prompts`
    pub dir: Option<String>,
}
