//! Configuration file support for Forge.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/forge/config.toml`.

use crate::tasks::{distinct_pool_names, DAILY_TASK_COUNT, DEFAULT_TASK_POOL};
use crate::{Error, Goal, Level, Location, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest accepted plan cache TTL: one year
pub const MAX_TTL_MINUTES: i64 = 525_600;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub plan: PlanDefaults,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub tasks: TaskConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values used for plan request fields the caller leaves out
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDefaults {
    #[serde(default)]
    pub location: Location,

    #[serde(default)]
    pub goal: Goal,

    #[serde(default)]
    pub level: Level,

    #[serde(default = "default_days")]
    pub days: u8,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            location: Location::default(),
            goal: Goal::default(),
            level: Level::default(),
            days: default_days(),
        }
    }
}

/// Plan cache configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            capacity: default_cache_capacity(),
        }
    }
}

impl CacheConfig {
    /// The TTL as a duration; out-of-range values are a config error
    pub fn ttl(&self) -> Result<Duration> {
        if !(0..=MAX_TTL_MINUTES).contains(&self.ttl_minutes) {
            return Err(Error::Config(format!(
                "cache.ttl_minutes must be between 0 and {} (got {})",
                MAX_TTL_MINUTES, self.ttl_minutes
            )));
        }
        Duration::try_minutes(self.ttl_minutes).ok_or_else(|| {
            Error::Config(format!("cache.ttl_minutes {} is out of range", self.ttl_minutes))
        })
    }
}

/// Daily task configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "default_daily_points")]
    pub daily_points: u32,

    /// Replaces the built-in daily task pool when set
    #[serde(default)]
    pub pool: Option<Vec<String>>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            daily_points: default_daily_points(),
            pool: None,
        }
    }
}

impl TaskConfig {
    /// The task-name pool daily tasks are drawn from
    pub fn pool(&self) -> Vec<String> {
        match &self.pool {
            Some(pool) => pool.clone(),
            None => DEFAULT_TASK_POOL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Exercise and meal catalog sources
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON exercise list replacing the built-in catalog
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// JSON meal list replacing the built-in meals
    #[serde(default)]
    pub meals_path: Option<PathBuf>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("forge")
}

fn default_days() -> u8 {
    3
}

fn default_ttl_minutes() -> i64 {
    20
}

fn default_cache_capacity() -> usize {
    256
}

fn default_daily_points() -> u32 {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("forge").join("config.toml")
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        self.cache.ttl()?;

        if let Some(pool) = &self.tasks.pool {
            let distinct = distinct_pool_names(pool).len();
            if distinct < DAILY_TASK_COUNT {
                return Err(Error::Config(format!(
                    "tasks.pool needs at least {} distinct names (got {})",
                    DAILY_TASK_COUNT, distinct
                )));
            }
        }

        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
