use crate::format::DateFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The digit keys `1` through `9` select presets, so there can be no more
/// than this many
const MAX_PRESETS: usize = 9;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) date_format: DateFormat,
    pub(crate) presets: Vec<Preset>,
    pub(crate) mouse: bool,
    pub(crate) log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            date_format: DateFormat::default(),
            presets: vec![
                Preset {
                    label: String::from("Last 7 Days"),
                    days: 7,
                },
                Preset {
                    label: String::from("Last 30 Days"),
                    days: 30,
                },
            ],
            mouse: true,
            log_file: None,
        }
    }
}

/// A quick-select range covering the given number of days up to today
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Preset {
    pub(crate) label: String,
    pub(crate) days: u32,
}

impl Config {
    /// Loads the configuration file at `explicit_path` if given, which must
    /// exist; otherwise loads the default config file if it exists, falling
    /// back to built-in defaults.  The path actually read is returned
    /// alongside.
    pub(crate) fn find_and_load(
        explicit_path: Option<&Path>,
    ) -> Result<(Config, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit_path {
            return Ok((Config::load(path)?, Some(path.to_path_buf())));
        }
        match default_path() {
            Some(path) if path.exists() => {
                let config = Config::load(&path)?;
                Ok((config, Some(path)))
            }
            _ => Ok((Config::default(), None)),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.presets.len() > MAX_PRESETS {
            return Err(ConfigError::TooManyPresets(self.presets.len()));
        }
        if let Some(i) = self.presets.iter().position(|p| p.label.trim().is_empty()) {
            return Err(ConfigError::EmptyPresetLabel(i + 1));
        }
        Ok(())
    }
}

/// `~/.config/wdpicker/config.toml`, or the platform's equivalent
fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(env!("CARGO_PKG_NAME")).join("config.toml"))
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("at most 9 presets may be configured, got {0}")]
    TooManyPresets(usize),
    #[error("preset #{0} has an empty label")]
    EmptyPresetLabel(usize),
}
