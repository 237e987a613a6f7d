//! # Tide Finder Core Library
//!
//! This library holds the data model and the pure data pipeline behind the tide
//! finder: a catalog of NOAA tide-prediction stations, nearest-station ranking,
//! and aggregation of a 5-day window of high/low predictions.
//!
//! ## Data Flow
//! 1. **Catalog**: fetch NOAA station metadata → normalize → dedupe → sort by name
//!    (falls back to a static list when the feed is unavailable)
//! 2. **Selection**: dropdown, search, or map click all resolve to a station id
//! 3. **Predictions**: fetch a 5-day high/low window → drop unusable heights →
//!    group by UTC day → extrema, next upcoming tide, per-day forecast
//!
//! The pipeline returns plain data and never prints. [`renderer`] turns a
//! report into terminal text for the binary.
//!
//! ## Core Types
//! - [`Station`]: a normalized catalog entry
//! - [`RankedStation`]: a station paired with its distance from a query point
//! - [`TideEvent`]: a single predicted high or low water

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Module declarations
pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod fallback;
pub mod geo;
pub mod ranking;
pub mod renderer;
pub mod session;
pub mod tide_data;

/// A NOAA tide-prediction station.
///
/// Stations are built once per catalog load and never mutated afterwards.
/// Only [`catalog::normalize_station`] and the static [`fallback`] list
/// create them, so `id` and `name` are always non-empty and the coordinates
/// are finite and in range.
///
/// # Example
/// ```
/// use tide_finder_lib::Station;
///
/// let station = Station {
///     id: "9410840".to_string(),
///     name: "Santa Monica, CA".to_string(),
///     state: Some("CA".to_string()),
///     lat: 34.008,
///     lng: -118.5,
/// };
/// assert_eq!(station.state.as_deref(), Some("CA"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// NOAA station code, unique within a catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// Two-letter state or region, when the feed provides one
    pub state: Option<String>,
    /// Latitude in degrees, -90..=90
    pub lat: f64,
    /// Longitude in degrees, -180..=180
    pub lng: f64,
}

/// A station paired with its distance from a reference point.
///
/// Computed fresh for every ranking query; the distance is never written
/// back onto the [`Station`].
#[derive(Clone, Debug, PartialEq)]
pub struct RankedStation {
    pub station: Station,
    /// Great-circle distance in kilometres
    pub distance_km: f64,
}

/// High or low water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideKind {
    High,
    Low,
}

impl TideKind {
    /// NOAA flags high water as exactly `"H"`; every other flag is low water.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "H" {
            TideKind::High
        } else {
            TideKind::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TideKind::High => "High",
            TideKind::Low => "Low",
        }
    }
}

/// A predicted high or low water at a station.
///
/// NOAA is queried with `time_zone=gmt`, so `timestamp` is a UTC wall-clock
/// time with no offset attached. `day_key` is always `timestamp.date()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub timestamp: NaiveDateTime,
    /// Height above the requested datum, in feet or metres per the unit setting
    pub height: f64,
    pub kind: TideKind,
    pub day_key: NaiveDate,
}

impl TideEvent {
    pub fn new(timestamp: NaiveDateTime, height: f64, kind: TideKind) -> Self {
        TideEvent {
            timestamp,
            height,
            kind,
            day_key: timestamp.date(),
        }
    }
}

/// Coerce a JSON value to a finite number the way a loosely typed feed expects:
/// numbers pass through, numeric strings are parsed after trimming.
///
/// Blank strings, `null`, booleans, and anything that parses to NaN or
/// infinity yield `None`.
pub(crate) fn coerce_finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}
