pub mod config;
pub mod history;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use config::{Config, ConfigStorage, GeneralConfig, TomlConfigStorage};
pub use history::{BincodeHistoryStorage, HistoryLock, HistoryStorage};

use crate::APP_ID;

pub const CONFIG_FILE: &str = "draobpilc.toml";
pub const HISTORY_FILE: &str = "history.bin";
pub const LOG_FILE: &str = "draobpilc.log";

/// Resolved locations of everything Draobpilc reads and writes
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn new(data_dir: PathBuf, config_dir: PathBuf) -> Self {
        Paths {
            data_dir,
            config_dir,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Load the configuration, creating the default file if needed
    pub fn load_config(&self) -> Result<(TomlConfigStorage, Config)> {
        let storage = TomlConfigStorage::new(self.config_file());
        let config = storage.load()?;
        Ok((storage, config))
    }

    /// History storage honouring the configured size limit
    pub fn history_storage(&self, config: &Config) -> BincodeHistoryStorage {
        BincodeHistoryStorage::new(self.history_file(), config.general.max_history)
    }
}

/// Ensure XDG data and config directories exist
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/draobpilc (default: ~/.local/share/draobpilc)
/// - Config: $XDG_CONFIG_HOME/draobpilc (default: ~/.config/draobpilc)
pub fn ensure_directories() -> Result<Paths> {
    let home = home_dir()?;

    let data_dir = xdg_dir("XDG_DATA_HOME", &home, ".local/share").join(APP_ID);
    let config_dir = xdg_dir("XDG_CONFIG_HOME", &home, ".config").join(APP_ID);

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);

    Ok(Paths::new(data_dir, config_dir))
}

pub fn home_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home))
}

fn xdg_dir(var: &str, home: &Path, fallback: &str) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home.join(fallback),
    }
}
