use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
}

/// General configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Maximum number of unpinned clipboard entries to keep
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Images larger than this are not recorded
    #[serde(default = "default_max_image_size")]
    pub max_image_size_bytes: u64,

    /// Exit the UI after copying an entry to the clipboard
    #[serde(default = "default_true")]
    pub exit_on_select: bool,

    /// Record new clipboard content (the toolbar's track toggle)
    #[serde(default = "default_true")]
    pub track_changes: bool,

    /// Show size/type details under the preview
    #[serde(default = "default_true")]
    pub show_preview_metadata: bool,

    /// Enable debug logging without passing --debug
    #[serde(default)]
    pub debug_logging: bool,

    /// Built-in theme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// How long warnings stay in the status bar
    #[serde(default = "default_flash_duration")]
    pub flash_message_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            max_history: default_max_history(),
            max_image_size_bytes: default_max_image_size(),
            exit_on_select: true,
            track_changes: true,
            show_preview_metadata: true,
            debug_logging: false,
            theme: default_theme(),
            flash_message_duration_ms: default_flash_duration(),
        }
    }
}

// Default value functions for serde
fn default_max_history() -> usize {
    500
}

fn default_max_image_size() -> u64 {
    52_428_800 // 50MB
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_flash_duration() -> u64 {
    4000
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration, creating a default file when missing
    fn load(&self) -> Result<Config>;

    fn save(&self, config: &Config) -> Result<()>;

    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        if config.general.max_history == 0 {
            log::warn!("max_history = 0 in {:?}, keeping 1 clip instead", self.path);
            config.general.max_history = 1;
        }

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: max_history={}, track_changes={}",
            config.general.max_history,
            config.general.track_changes
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        let toml_str =
            toml::to_string_pretty(config).context("Failed to serialize configuration")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Example config compiled into the binary
        let example_config = include_str!("../../draobpilc.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}
