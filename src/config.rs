//! Delivery handler configuration.
//!
//! Configuration is a flat key-value table of raw strings, the way a host
//! platform stores handler settings. Typed accessors normalize the raw
//! values and report missing required keys.
//!
//! ```toml
//! [handler]
//! MAP_ID = "3"
//! PROPERTY_LAT = "LAT"
//! PROPERTY_LON = "LON"
//! DEFAULT_PRICE = "1 000"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ZoneError;
use crate::models::DefaultPricing;

pub const MAP_ID: &str = "MAP_ID";
pub const PROPERTY_LAT: &str = "PROPERTY_LAT";
pub const PROPERTY_LON: &str = "PROPERTY_LON";
pub const DEFAULT_PRICE: &str = "DEFAULT_PRICE";
pub const DEFAULT_PERIOD_FROM: &str = "DEFAULT_PERIOD_FROM";
pub const DEFAULT_PERIOD_TO: &str = "DEFAULT_PERIOD_TO";

/// Which order property holds a coordinate component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lat,
    Lon,
}

impl Axis {
    pub fn config_key(&self) -> &'static str {
        match self {
            Axis::Lat => PROPERTY_LAT,
            Axis::Lon => PROPERTY_LON,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    handler: HashMap<String, toml::Value>,
}

/// Raw handler settings
#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    values: HashMap<String, String>,
}

impl HandlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value, replacing any previous one
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Load the `[handler]` table of a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse config file")?;

        let mut config = Self::new();
        for (key, value) in file.handler {
            let raw = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => anyhow::bail!(
                    "config {} must be a string or number, got {}",
                    key,
                    other.type_str()
                ),
            };
            config.set(&key, raw);
        }

        Ok(config)
    }

    /// Raw value with all whitespace removed, read as an integer.
    /// Non-numeric or empty values read as absent.
    pub fn number_value(&self, key: &str) -> Option<i64> {
        let raw = self.values.get(key)?;
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        parse_numeric(&compact).map(|v| v.trunc() as i64)
    }

    /// Trimmed raw value; empty reads as absent
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn map_id(&self) -> Result<i64, ZoneError> {
        self.number_value(MAP_ID)
            .ok_or_else(|| ZoneError::Configuration(format!("config {}", MAP_ID)))
    }

    /// Order property code holding the given coordinate component
    pub fn property_code(&self, axis: Axis) -> Result<&str, ZoneError> {
        let key = axis.config_key();
        self.string_value(key)
            .ok_or_else(|| ZoneError::Configuration(format!("config {}", key)))
    }

    pub fn default_pricing(&self) -> DefaultPricing {
        DefaultPricing {
            price: self.number_value(DEFAULT_PRICE),
            period_from: self.number_value(DEFAULT_PERIOD_FROM),
            period_to: self.number_value(DEFAULT_PERIOD_TO),
        }
    }
}

/// Decimal number with optional sign, fraction and exponent.
/// Infinities and NaN are not numeric.
pub fn parse_numeric(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    if value
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
