use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_WORK_MINUTES: u32 = 25;
const DEFAULT_BREAK_MINUTES: u32 = 5;
const DEFAULT_STATS_REFRESH_SECS: u64 = 60;
const DEFAULT_AVERAGE_MINUTES: u32 = 25;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage_file: Option<PathBuf>,
    #[serde(default)]
    pub work_minutes: Option<u32>,
    #[serde(default)]
    pub break_minutes: Option<u32>,
    #[serde(default)]
    pub stats_refresh_secs: Option<u64>,
    #[serde(default)]
    pub default_average_minutes: Option<u32>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("SHADOW_CONFIG") {
            return Some(PathBuf::from(path));
        }
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/shadow-board/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("shadow-board/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("shadow-board\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Reads a config file, falling back to defaults when it is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn effective_storage_file(&self) -> PathBuf {
        self.storage_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("shadow-board").join("storage.json"))
                .unwrap_or_else(|| PathBuf::from("shadow-board.json"))
        })
    }

    pub fn effective_work_secs(&self) -> u32 {
        self.work_minutes
            .unwrap_or(DEFAULT_WORK_MINUTES)
            .saturating_mul(60)
    }

    pub fn effective_break_secs(&self) -> u32 {
        self.break_minutes
            .unwrap_or(DEFAULT_BREAK_MINUTES)
            .saturating_mul(60)
    }

    pub fn effective_stats_refresh_secs(&self) -> u64 {
        self.stats_refresh_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_STATS_REFRESH_SECS)
    }

    pub fn effective_default_average_secs(&self) -> u64 {
        u64::from(self.default_average_minutes.unwrap_or(DEFAULT_AVERAGE_MINUTES)) * 60
    }
}
