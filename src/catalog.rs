//! # Station Catalog
//!
//! Turns NOAA's station metadata into a clean, deduplicated, name-sorted list.
//!
//! The metadata feed is best-effort: field names vary between endpoints
//! (`id`/`stationId`, `lat`/`latitude`, `lng`/`lon`/`longitude`) and numbers
//! arrive as either JSON numbers or strings. Records that can't be coerced
//! into a usable [`Station`] are dropped silently; an empty result is not an
//! error here, the caller decides whether to fall back to
//! [`crate::fallback::stations`].

use crate::{coerce_finite, Station};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// The catalog normalized to zero stations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No tide-prediction stations were returned by NOAA.")]
pub struct EmptyCatalogError;

/// A station id that isn't in the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown station: {0}")]
pub struct UnknownStation(pub String);

/// Ordered, id-unique set of stations.
///
/// Sorted by name for display. A reload replaces the whole catalog; there is
/// no incremental merge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    stations: Vec<Station>,
}

/// First non-null value among the candidate keys, mirroring `a ?? b ?? c`.
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// Render a scalar as trimmed text. Ids sometimes arrive as bare numbers.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Normalize one raw station record.
///
/// Returns `None` when the id or name is blank, or either coordinate fails to
/// coerce to a finite, in-range number.
pub fn normalize_station(raw: &Value) -> Option<Station> {
    let id = coerce_text(first_present(raw, &["id", "stationId"]));
    let name = coerce_text(first_present(raw, &["name", "stationName"]));
    let lat = first_present(raw, &["lat", "latitude"]).and_then(coerce_finite)?;
    let lng = first_present(raw, &["lng", "lon", "longitude"]).and_then(coerce_finite)?;
    let state = coerce_text(raw.get("state"));

    if id.is_empty() || name.is_empty() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }

    Some(Station {
        id,
        name,
        state: (!state.is_empty()).then_some(state),
        lat,
        lng,
    })
}

/// Case-insensitive name order with a byte-wise tiebreak, then id, so the
/// result is fully deterministic.
fn display_order(a: &Station, b: &Station) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Normalize a list of raw records into a catalog.
///
/// When two accepted records share an id, the later one wins.
pub fn normalize<'a, I>(raw: I) -> Catalog
where
    I: IntoIterator<Item = &'a Value>,
{
    Catalog::from_stations(raw.into_iter().filter_map(normalize_station).collect())
}

impl Catalog {
    /// Build a catalog from already-valid stations, keeping the last entry
    /// per id and sorting by name.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut unique: Vec<Station> = Vec::with_capacity(stations.len());
        let mut index_by_id: HashMap<String, usize> = HashMap::new();

        for station in stations {
            match index_by_id.get(&station.id) {
                Some(&index) => unique[index] = station,
                None => {
                    index_by_id.insert(station.id.clone(), unique.len());
                    unique.push(station);
                }
            }
        }

        unique.sort_by(display_order);
        Catalog { stations: unique }
    }

    /// Fail with [`EmptyCatalogError`] when there is nothing to pick from.
    pub fn non_empty(self) -> Result<Self, EmptyCatalogError> {
        if self.stations.is_empty() {
            Err(EmptyCatalogError)
        } else {
            Ok(self)
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station_by_id(&self, id: &str) -> Result<&Station, UnknownStation> {
        self.stations
            .iter()
            .find(|station| station.id == id)
            .ok_or_else(|| UnknownStation(id.to_string()))
    }

    /// Station name for display, or the id itself when it isn't in the catalog.
    pub fn label_for(&self, id: &str) -> String {
        self.station_by_id(id)
            .map(|station| station.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    /// Case-insensitive substring search over name, state and id.
    ///
    /// A blank query matches everything. Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&Station> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.stations.iter().collect();
        }

        self.stations
            .iter()
            .filter(|station| {
                let haystack = format!(
                    "{} {} {}",
                    station.name,
                    station.state.as_deref().unwrap_or(""),
                    station.id
                )
                .to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }
}

/// Dropdown-style label: `"Name, ST (id)"`, or `"Name (id)"` without a state.
pub fn option_label(station: &Station) -> String {
    match station.state.as_deref() {
        Some(state) => format!("{}, {} ({})", station.name, state, station.id),
        None => format!("{} ({})", station.name, station.id),
    }
}
