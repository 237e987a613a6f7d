//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It centralizes the default station, the reference point used for the
//! "nearby stations" list, and the NOAA API settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Errors writing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config IO: {0}")]
    Io(#[from] io::Error),
}

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Station selection defaults
    pub station: StationConfig,
    /// Point that anchors the nearby-stations list
    pub reference: ReferencePoint,
    /// Nearby-station ranking limits
    pub nearby: NearbyConfig,
    /// NOAA endpoints and query parameters
    pub api: ApiConfig,
}

/// Station selection defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StationConfig {
    /// NOAA station ID selected at startup when present in the catalog
    pub default_id: String,
}

/// A named location stations are ranked against.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferencePoint {
    /// Display name, e.g. "Santa Monica, CA"
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl ReferencePoint {
    /// The place part of the name, before any ", ST" suffix.
    pub fn place_name(&self) -> &str {
        self.name.split(',').next().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NearbyConfig {
    /// Maximum number of nearby stations listed
    pub limit: usize,
    /// Search radius in kilometres
    pub radius_km: f64,
}

/// Height units requested from NOAA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Feet
    English,
    /// Metres
    Metric,
}

impl Units {
    /// Query-string value
    pub fn as_param(self) -> &'static str {
        match self {
            Units::English => "english",
            Units::Metric => "metric",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Units::English => "ft",
            Units::Metric => "m",
        }
    }
}

/// NOAA Tides & Currents API settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Station metadata endpoint
    pub stations_url: String,
    /// Prediction data endpoint
    pub predictions_url: String,
    /// Application name NOAA asks clients to identify with
    pub application: String,
    /// Vertical datum, e.g. MLLW
    pub datum: String,
    pub units: Units,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        StationConfig {
            default_id: "9410840".to_string(),
        }
    }
}

impl Default for ReferencePoint {
    fn default() -> Self {
        ReferencePoint {
            name: "Santa Monica, CA".to_string(),
            lat: 34.0195,
            lng: -118.4912,
        }
    }
}

impl Default for NearbyConfig {
    fn default() -> Self {
        NearbyConfig {
            limit: 9,
            radius_km: 180.0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            stations_url:
                "https://api.tidesandcurrents.noaa.gov/mdapi/prod/webapi/stations.json?type=tidepredictions"
                    .to_string(),
            predictions_url: "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter".to_string(),
            application: "tide_pop_app".to_string(),
            datum: "MLLW".to_string(),
            units: Units::English,
            timeout_secs: 15,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig::default(),
            reference: ReferencePoint::default(),
            nearby: NearbyConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "invalid config file format: {e}");
                    warn!("using default configuration ({})", Self::default().reference.name);
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Write this configuration as pretty TOML.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
