//! Typed configuration from environment variables or a TOML file.
//!
//! Every field has a default; malformed values fail fast with
//! [`Error::Config`].

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::CharacterClass;
use crate::notify::DEFAULT_NOTIFICATION_TTL;
use crate::views::DEFAULT_ATTRIBUTE_CAP;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub otel_endpoint: Option<String>,
    pub notification_ttl_ms: u64,
    pub attribute_cap: i32,
    /// Class given to the character provisioned on first start.
    pub default_class: CharacterClass,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otel_endpoint: None,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL.as_millis() as u64,
            attribute_cap: DEFAULT_ATTRIBUTE_CAP,
            default_class: CharacterClass::default(),
        }
    }
}

/// On-disk shape: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    log_level: Option<String>,
    otel_endpoint: Option<String>,
    notification_ttl_ms: Option<u64>,
    attribute_cap: Option<i32>,
    default_class: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this, or use
    /// [`Config::load`].
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            log_level: std::env::var("QUESTLINE_LOG_LEVEL").unwrap_or(defaults.log_level),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            notification_ttl_ms: parsed_var("QUESTLINE_NOTIFICATION_TTL_MS")?
                .unwrap_or(defaults.notification_ttl_ms),
            attribute_cap: positive_cap(
                parsed_var("QUESTLINE_ATTRIBUTE_CAP")?.unwrap_or(defaults.attribute_cap),
            )?,
            default_class: parsed_var("QUESTLINE_DEFAULT_CLASS")?
                .unwrap_or(defaults.default_class),
        })
    }

    /// `.env` (if present) then environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(s)?;
        let defaults = Self::default();
        let default_class = match file.default_class {
            Some(name) => parse_class(&name)?,
            None => defaults.default_class,
        };
        Ok(Self {
            log_level: file.log_level.unwrap_or(defaults.log_level),
            otel_endpoint: file.otel_endpoint,
            notification_ttl_ms: file
                .notification_ttl_ms
                .unwrap_or(defaults.notification_ttl_ms),
            attribute_cap: positive_cap(file.attribute_cap.unwrap_or(defaults.attribute_cap))?,
            default_class,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

fn parse_class(name: &str) -> Result<CharacterClass> {
    name.parse().map_err(Error::Config)
}

fn positive_cap(cap: i32) -> Result<i32> {
    if cap > 0 {
        Ok(cap)
    } else {
        Err(Error::Config(format!("attribute cap must be positive, got {cap}")))
    }
}

/// Parse an optional environment variable. Unset is `None`; set but
/// unparsable is an error.
fn parsed_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid value for {name}: {e}"))),
        Err(_) => Ok(None),
    }
}
