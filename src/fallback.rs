//! # Fallback Station List
//!
//! A small static catalog used when NOAA's station metadata can't be loaded
//! or normalizes to nothing. It covers the Southern California coast around
//! the default reference point plus San Francisco, which is enough to keep
//! the app usable while the metadata feed is down.
//!
//! Predictions for these stations still come from NOAA; only the catalog is
//! static.

use crate::catalog::Catalog;
use crate::Station;

/// (id, name, state, lat, lng)
const FALLBACK_STATIONS: [(&str, &str, &str, f64, f64); 5] = [
    ("9410840", "Santa Monica, CA", "CA", 34.008, -118.5),
    ("9410660", "Los Angeles, CA", "CA", 33.72, -118.273),
    ("9411340", "Port Hueneme, CA", "CA", 34.147, -119.195),
    ("9410230", "La Jolla, CA", "CA", 32.867, -117.257),
    ("9414290", "San Francisco, CA", "CA", 37.806, -122.465),
];

/// The fallback stations in their listed order.
pub fn stations() -> Vec<Station> {
    FALLBACK_STATIONS
        .iter()
        .map(|&(id, name, state, lat, lng)| Station {
            id: id.to_string(),
            name: name.to_string(),
            state: Some(state.to_string()),
            lat,
            lng,
        })
        .collect()
}

/// The fallback stations as a name-sorted catalog.
pub fn catalog() -> Catalog {
    Catalog::from_stations(stations())
}
