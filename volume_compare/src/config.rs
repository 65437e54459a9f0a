//! Runtime settings: TOML file, environment overrides and fallbacks.
//!
//! Settings are resolved once at startup. Each value is taken from the first
//! layer that provides it:
//!
//! 1. environment (`SYMBOL`, `DAYS_AVERAGE`, `VOLUME`, `TIMEZONE`)
//! 2. the `[default]` table of the config file, if one is given
//! 3. built-in fallbacks
//!
//! The terminal is configured only through the file's `[terminal]` table:
//!
//! ```toml
//! [default]
//! symbol = "WIN$N"
//! days_average = 5
//! volume = "tick"
//! timezone = "America/Sao_Paulo"
//! thousands_separator = "."
//!
//! [terminal]
//! kind = "bridge"
//! url = "http://127.0.0.1:8228"
//! page_limit = 1000
//! ```

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono_tz::Tz;
use market_data::{
    models::bar::{UnknownVolumeKindError, VolumeKind},
    providers::{terminal::DEFAULT_PAGE_LIMIT, terminal_bridge::client::DEFAULT_BRIDGE_URL},
};
use serde::Deserialize;
use shared_utils::env::optional_env_var;
use thiserror::Error;
use tracing::debug;

use crate::presentation::DEFAULT_THOUSANDS_SEPARATOR;

/// Names the config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "VOLUME_COMPARE_CONFIG";

pub const DEFAULT_SYMBOL: &str = "WIN$N";
pub const DEFAULT_DAYS_AVERAGE: u32 = 5;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid number of days {value:?}: expected a positive integer")]
    InvalidDays { value: String },

    #[error("Invalid volume setting: {0}")]
    Volume(#[from] UnknownVolumeKindError),

    #[error("Unknown timezone {name:?}")]
    UnknownTimezone { name: String },
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalSettings {
    /// A live terminal behind an HTTP bridge.
    Bridge {
        #[serde(default = "default_bridge_url")]
        url: String,
        #[serde(default = "default_page_limit")]
        page_limit: usize,
    },
    /// A rates export replayed from disk. `symbol` defaults to the configured symbol.
    Csv {
        path: PathBuf,
        symbol: Option<String>,
        #[serde(default = "default_page_limit")]
        page_limit: usize,
    },
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings::Bridge {
            url: default_bridge_url(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_bridge_url() -> String {
    DEFAULT_BRIDGE_URL.to_string()
}

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub default: DefaultSection,
    pub terminal: Option<TerminalSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultSection {
    pub symbol: Option<String>,
    pub days_average: Option<u32>,
    pub volume: Option<String>,
    pub timezone: Option<String>,
    pub thousands_separator: Option<char>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub symbol: String,
    pub days_average: u32,
    pub volume: VolumeKind,
    pub timezone: Tz,
    pub terminal: TerminalSettings,
    pub thousands_separator: char,
}

impl Settings {
    /// Loads settings from `path`, or from the file named by `VOLUME_COMPARE_CONFIG`,
    /// then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from));

        let file = match &path {
            Some(path) => {
                debug!(path = %path.display(), "reading config file");
                FileConfig::from_path(path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(file, optional_env_var)
    }

    /// Layers `lookup` (the environment) over `file` over the fallbacks.
    pub fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let FileConfig { default, terminal } = file;

        let symbol = lookup("SYMBOL")
            .or(default.symbol)
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());

        let days_average = match lookup("DAYS_AVERAGE") {
            Some(raw) => parse_days(&raw)?,
            None => default.days_average.unwrap_or(DEFAULT_DAYS_AVERAGE),
        };
        if days_average == 0 {
            return Err(ConfigError::InvalidDays {
                value: days_average.to_string(),
            });
        }

        let volume = match lookup("VOLUME").or(default.volume) {
            Some(raw) => raw.parse::<VolumeKind>()?,
            None => VolumeKind::default(),
        };

        let timezone = match lookup("TIMEZONE").or(default.timezone) {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimezone { name })?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(Self {
            symbol,
            days_average,
            volume,
            timezone,
            terminal: terminal.unwrap_or_default(),
            thousands_separator: default
                .thousands_separator
                .unwrap_or(DEFAULT_THOUSANDS_SEPARATOR),
        })
    }
}

fn parse_days(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidDays {
            value: raw.to_string(),
        })
}
