use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ladder::{scale::default_tiers, RankScale, RankTier};
use crate::models::{PlayerKey, RankTrackerError, Result};

/// One week.
pub const MAX_REFRESH_INTERVAL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub api: ApiSettings,
    pub tracker: TrackerSettings,
    pub rank_scale: Vec<RankTier>,
    pub players: Vec<PlayerSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    pub refresh_interval_seconds: u64,
    pub snapshot_path: PathBuf,
    pub progress_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub nickname: String,
    pub platform: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Rank Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            api: ApiSettings {
                base_url: "https://api.mozambiquehe.re/bridge".to_string(),
                api_key: String::new(),
                timeout_seconds: 10,
                max_retries: 3,
                retry_base_delay_ms: 500,
            },
            tracker: TrackerSettings {
                refresh_interval_seconds: 60,
                snapshot_path: PathBuf::from("players_snapshot.json"),
                progress_width: 14,
            },
            rank_scale: default_tiers(),
            players: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::from_dir("config")
    }

    /// Defaults overlaid with `<dir>/default` and `<dir>/local` when they
    /// exist, then the environment. A file that exists but does not parse
    /// is an error.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> std::result::Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join("local").to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("RANK_TRACKER").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("RANK_TRACKER").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Write a starter settings file. Refuses to overwrite an existing one.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(RankTrackerError::ConfigError(format!(
                "{} already exists",
                path.display()
            )));
        }

        let mut settings = Settings::default();
        settings.players.push(PlayerSettings {
            nickname: String::new(),
            platform: "PC".to_string(),
        });

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&settings)?)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base URL must not be empty".to_string());
        }

        if self.api.max_retries == 0 {
            return Err("API max_retries must be at least 1".to_string());
        }

        if self.tracker.refresh_interval_seconds == 0 {
            return Err("Refresh interval must be at least 1 second".to_string());
        }

        if self.tracker.refresh_interval_seconds > MAX_REFRESH_INTERVAL_SECONDS {
            return Err(format!(
                "Refresh interval must be at most {} seconds",
                MAX_REFRESH_INTERVAL_SECONDS
            ));
        }

        if self.tracker.progress_width == 0 {
            return Err("Progress width must be at least 1".to_string());
        }

        if let Some(p) = self.players.iter().find(|p| p.nickname.trim().is_empty()) {
            return Err(format!("Player on platform {} has no nickname", p.platform));
        }

        Ok(())
    }

    pub fn refresh_interval(&self) -> chrono::Duration {
        let secs = self
            .tracker
            .refresh_interval_seconds
            .min(MAX_REFRESH_INTERVAL_SECONDS);
        chrono::Duration::seconds(secs as i64)
    }

    /// The configured tiers as a validated scale.
    pub fn rank_scale(&self) -> Result<RankScale> {
        RankScale::new(self.rank_scale.clone())
    }

    pub fn player_keys(&self) -> Vec<PlayerKey> {
        self.players
            .iter()
            .map(|p| PlayerKey::new(p.nickname.clone(), p.platform.clone()))
            .collect()
    }
}
