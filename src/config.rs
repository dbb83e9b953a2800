//! Configuration for the `ipmask` log filter.
//!
//! Values come from built-in defaults, then an optional JSON file, then
//! `IPMASK_*` environment variables.

use crate::error::ClassifyError;
use crate::models::DEFAULT_MASK;
use crate::processing::{classify, MaskingService, CONNECTION_ADDRESS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

/// Environment variable naming the JSON config file.
pub const ENV_CONFIG: &str = "IPMASK_CONFIG";
pub const ENV_MASK: &str = "IPMASK_MASK";
pub const ENV_DEFAULT_MASK: &str = "IPMASK_DEFAULT_MASK";
pub const ENV_MODE: &str = "IPMASK_MODE";
pub const ENV_ESCAPE: &str = "IPMASK_ESCAPE";
pub const ENV_LOG_CONFIG: &str = "IPMASK_LOG_CONFIG";

/// Which part of a log line gets masked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// First space-delimited field (the remote host column).
    #[default]
    Field,
    /// Every IPv4 literal anywhere in the line.
    Scan,
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<FilterMode, String> {
        match s.to_ascii_lowercase().as_str() {
            "field" => Ok(FilterMode::Field),
            "scan" => Ok(FilterMode::Scan),
            other => Err(format!("unknown filter mode {other:?}, expected field or scan")),
        }
    }
}

/// Filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mask specifier applied to every address. Empty means `default_mask`.
    pub mask: String,
    /// Mask substituted for an empty specifier.
    pub default_mask: String,
    pub mode: FilterMode,
    /// Escape the masked field before writing it.
    pub escape: bool,
    /// Path of the log4rs YAML file.
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mask: String::new(),
            default_mask: DEFAULT_MASK.to_string(),
            mode: FilterMode::Field,
            escape: false,
            log_config: "log4rs.yml".to_string(),
        }
    }
}

impl Config {
    /// Load defaults, the optional JSON file and environment overrides, then
    /// validate the result.
    pub fn load(config_file: Option<&str>) -> Result<Config, Box<dyn Error>> {
        let mut config = match config_file {
            Some(file) => Config::from_file(file)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file(file: &str) -> Result<Config, Box<dyn Error>> {
        if !Path::new(file).exists() {
            return Err(format!("Config file does not exist: {file}").into());
        }
        let json = std::fs::read_to_string(file)
            .map_err(|e| format!("Error reading config file {file}: {e}"))?;
        let config: Config = serde_json::from_str(&json)
            .map_err(|e| format!("Error parsing config JSON {file}: {e}"))?;
        Ok(config)
    }

    /// Override fields from `IPMASK_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mask) = lookup(ENV_MASK) {
            self.mask = mask;
        }
        if let Some(mask) = lookup(ENV_DEFAULT_MASK) {
            self.default_mask = mask;
        }
        if let Some(mode) = lookup(ENV_MODE) {
            self.mode = mode.parse().map_err(|e| format!("{ENV_MODE}: {e}"))?;
        }
        if let Some(escape) = lookup(ENV_ESCAPE) {
            self.escape = parse_bool(&escape).ok_or_else(|| {
                format!("{ENV_ESCAPE}: expected true or false, got {escape:?}")
            })?;
        }
        if let Some(log_config) = lookup(ENV_LOG_CONFIG) {
            self.log_config = log_config;
        }
        Ok(())
    }

    /// Reject masks that could never apply to an IPv4 address.
    ///
    /// `"c"` is refused as well, there is no connection address offline.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.mask == CONNECTION_ADDRESS {
            return Err(format!(
                "mask {CONNECTION_ADDRESS:?} selects the connection address and cannot be used to filter log files"
            )
            .into());
        }
        for (name, mask) in [("mask", &self.mask), ("default_mask", &self.default_mask)] {
            if let Err(ClassifyError::InvalidInput { reason }) = classify("0.0.0.0", mask) {
                return Err(format!("Invalid {name} {mask:?}: {reason}").into());
            }
        }
        Ok(())
    }

    /// Masking service honouring `default_mask`.
    pub fn service(&self) -> MaskingService {
        MaskingService::with_default_mask(self.default_mask.clone())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
