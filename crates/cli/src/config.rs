use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use schedkit_core::{Config, MinuteHandling, OffsetSource, ParseMode};

/// CLI configuration loaded from TOML file.
///
/// Every field is optional; unset fields keep the value from the
/// environment-derived [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// "lenient" or "strict"
    #[serde(default)]
    pub parse_mode: Option<ParseMode>,

    /// "fixed" or "iana"
    #[serde(default)]
    pub offset_source: Option<OffsetSource>,

    /// "preserve" or "carry"
    #[serde(default)]
    pub minute_handling: Option<MinuteHandling>,

    /// Year used for month lengths and DST lookups
    #[serde(default)]
    pub reference_year: Option<i32>,

    /// Default source timezone for `convert`
    #[serde(default)]
    pub default_from: Option<String>,

    /// Default target timezone for `convert`
    #[serde(default)]
    pub default_to: Option<String>,

    /// Per-session history cap (0 = unbounded)
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Extra holidays (MM-DD) added to the common defaults
    #[serde(default)]
    pub holidays: Vec<String>,
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/schedkit/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("schedkit");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };
        Self::load_from(&config_path)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!(?config_path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Layer file values over `base`.
    pub fn apply(&self, mut base: Config) -> Config {
        if let Some(mode) = self.parse_mode {
            base.engine.parse_mode = mode;
        }
        if let Some(source) = self.offset_source {
            base.engine.offset_source = source;
        }
        if let Some(minutes) = self.minute_handling {
            base.engine.minute_handling = minutes;
        }
        if self.reference_year.is_some() {
            base.engine.reference_year = self.reference_year;
        }
        if let Some(ref from) = self.default_from {
            base.defaults.source_zone = from.clone();
        }
        if let Some(ref to) = self.default_to {
            base.defaults.target_zone = to.clone();
        }
        if let Some(limit) = self.history_limit {
            base.history_limit = limit;
        }
        base
    }
}
