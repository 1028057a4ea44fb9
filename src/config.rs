//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::dataset::LoaderConfig;
use crate::index::{IndexerConfig, LabelStyle, PeriodOrdering, UnresolvedPolicy, YearRange};
use crate::layout::LayoutConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexSection,

    #[serde(default)]
    pub labels: LabelStyle,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub loader: LoaderSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Indexer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexSection {
    #[serde(default)]
    pub period_ordering: PeriodOrdering,

    #[serde(default)]
    pub unresolved: UnresolvedPolicy,

    /// Year range used when the dataset has neither periods nor sages
    #[serde(default = "default_range")]
    pub default_range: YearRange,
}

fn default_range() -> YearRange {
    YearRange::new(-350, 650)
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            period_ordering: PeriodOrdering::default(),
            unresolved: UnresolvedPolicy::default(),
            default_range: default_range(),
        }
    }
}

/// Dataset fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderSection {
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sages").join("config.toml")),
            Some(PathBuf::from("/etc/sages/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Settings for the dataset indexer
    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            period_ordering: self.index.period_ordering,
            unresolved_policy: self.index.unresolved,
        }
    }

    /// Settings for the dataset loader
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            fetch_timeout_ms: self.loader.fetch_timeout_ms,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, returning the keys whose values were rejected
    fn apply_overrides<F>(&mut self, lookup: F) -> Vec<&'static str>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();

        if let Some(ordering) = lookup("SAGES_ORDERING") {
            match ordering.parse::<PeriodOrdering>() {
                Ok(o) => self.index.period_ordering = o,
                Err(e) => {
                    tracing::warn!("Ignoring SAGES_ORDERING: {}", e);
                    rejected.push("SAGES_ORDERING");
                }
            }
        }
        if let Some(policy) = lookup("SAGES_UNRESOLVED") {
            match policy.parse::<UnresolvedPolicy>() {
                Ok(p) => self.index.unresolved = p,
                Err(e) => {
                    tracing::warn!("Ignoring SAGES_UNRESOLVED: {}", e);
                    rejected.push("SAGES_UNRESOLVED");
                }
            }
        }

        if let Some(timeout) = lookup("SAGES_FETCH_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.loader.fetch_timeout_ms = ms,
                Err(e) => {
                    tracing::warn!("Ignoring SAGES_FETCH_TIMEOUT_MS: {}", e);
                    rejected.push("SAGES_FETCH_TIMEOUT_MS");
                }
            }
        }

        if let Some(level) = lookup("SAGES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SAGES_LOG_FORMAT") {
            self.logging.format = format;
        }

        rejected
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sages Configuration
#
# Environment variables override these settings:
# - SAGES_ORDERING
# - SAGES_UNRESOLVED
# - SAGES_FETCH_TIMEOUT_MS
# - SAGES_LOG_LEVEL
# - SAGES_LOG_FORMAT

[index]
# Period order: declared (order of the periods array) or chronological (by start year)
period_ordering = "declared"

# Sages referencing unknown periods: reject, quarantine or tolerate
unresolved = "quarantine"

# Year range used when the dataset is empty
default_range = { min = -350, max = 650 }

[labels]
# Periods whose groups are pairs instead of generations
paired_periods = ["zugot"]
paired_prefix = "Pair"
generation_prefix = "Generation"

[layout]
width = 1200.0
height = 900.0

# Band padding (fraction of a band step)
padding = 0.2

# Space above the first name in a cell
top_pad = 25.0
bottom_slack = 5.0
min_line_height = 10.0
empty_line_height = 14.0

[layout.margin]
top = 60.0
right = 60.0
bottom = 80.0
left = 150.0

[loader]
# Timeout for reading a dataset file or URL (ms)
fetch_timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
