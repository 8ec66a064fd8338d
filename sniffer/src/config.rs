use crate::config::ConfigError::WrongLogLevel;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_FILTER: &str = "udp port 5353";
const DEFAULT_SNAPSHOT_LENGTH: i32 = 65535;
const DEFAULT_TIMEOUT_MS: i32 = 500;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_format: String,
    pub log_to_file: bool,

    /// Device name or description. The busiest usable device is taken if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Savefile to replay instead of a live device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_file: Option<PathBuf>,
    pub filter: String,
    pub promiscuous: bool,
    pub snapshot_length: i32,
    pub timeout_ms: i32,

    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: crate::logging::DEFAULT_FORMAT.to_string(),
            log_to_file: false,
            interface: None,
            capture_file: None,
            filter: DEFAULT_FILTER.to_string(),
            promiscuous: true,
            snapshot_length: DEFAULT_SNAPSHOT_LENGTH,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            channel_capacity: bonjour::stream::DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_file() -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(CONFIG_FILENAME);
        if data.is_err() {
            let config = Config::default();
            config.save_to_file()?;
            return Ok(config);
        }

        Self::from_toml(&data.unwrap_or_default())
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(data).map_err(ConfigError::TomlDeserializationError)?;

        if config.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }

        Ok(config)
    }

    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let data = toml::to_string(&self).map_err(ConfigError::TomlSerializationError)?;

        std::fs::write(CONFIG_FILENAME, data).map_err(ConfigError::IOError)?;

        Ok(())
    }
}

impl Config {
    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| WrongLogLevel)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error.")]
    IOError(#[from] std::io::Error),

    #[error("TOML Serialization Error.")]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error("TOML Deserialization Error.")]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error("Wrong log level.")]
    WrongLogLevel,

    #[error("Channel capacity must be greater than zero.")]
    ZeroChannelCapacity,
}

impl ConfigError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            ConfigError::IOError(err) => Some(err.to_string()),
            ConfigError::TomlSerializationError(err) => Some(err.to_string()),
            ConfigError::TomlDeserializationError(err) => Some(err.to_string()),
            _ => None,
        }
    }
}
