//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Destination folder, relative to the user's home unless absolute
    pub output_dir: String,
    pub engine: EngineSettings,
    pub logging: LoggingConfig,
}

/// Settings handed to the media engine on every download
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Engine executable, looked up on PATH when not absolute
    pub binary: String,
    pub retries: u32,
    pub fragment_retries: u32,
    pub socket_timeout_secs: u64,
    pub http_chunk_size: u64,
    pub concurrent_fragments: u32,
    /// Height cap for the video format selector
    pub max_video_height: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // "error", "warn", "info", "debug", "trace"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: "Downloads".to_string(),
            engine: EngineSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            retries: 3,
            fragment_retries: 3,
            socket_timeout_secs: 30,
            http_chunk_size: 10 * 1024 * 1024, // 10MB
            concurrent_fragments: 4,
            max_video_height: 1080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl AppConfig {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, creating default if not exists
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: AppConfig =
                serde_json::from_str(&content).with_context(|| "Failed to parse config file")?;

            tracing::info!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load and validate, falling back to defaults on any problem
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::resolve(Self::load_at(config_path))
    }

    /// Load from `config_path`, or from the default location when `None`
    pub fn load_at(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Validate a load result, replacing anything unusable with defaults
    pub fn resolve(loaded: Result<Self>) -> Self {
        match loaded {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => cfg,
                Err(err) => {
                    tracing::warn!(
                        "Invalid configuration detected ({}), falling back to defaults",
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!(
                    "Failed to load configuration from disk: {:#}. Using defaults",
                    err
                );
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "ant", "ant-downloader")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.trim().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }

        if self.engine.binary.trim().is_empty() {
            anyhow::bail!("Engine binary must not be empty");
        }

        if self.engine.retries > 20 || self.engine.fragment_retries > 20 {
            anyhow::bail!("Retry attempts should not exceed 20");
        }

        if self.engine.socket_timeout_secs == 0 || self.engine.socket_timeout_secs > 300 {
            anyhow::bail!("Socket timeout should be between 1 and 300 seconds");
        }

        if self.engine.http_chunk_size < 1024 * 1024 {
            anyhow::bail!("HTTP chunk size should be at least 1MB");
        }

        if self.engine.concurrent_fragments == 0 || self.engine.concurrent_fragments > 32 {
            anyhow::bail!("Concurrent fragments should be between 1 and 32");
        }

        if !(144..=4320).contains(&self.engine.max_video_height) {
            anyhow::bail!("Max video height should be between 144 and 4320");
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level: must be 'error', 'warn', 'info', 'debug', or 'trace'"
            );
        }

        Ok(())
    }
}
