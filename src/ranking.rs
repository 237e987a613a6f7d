//! # Nearest-Station Ranking
//!
//! Orders a catalog by great-circle distance from a reference point. Used for
//! the "stations near me" list and for picking a sensible initial station.

use crate::catalog::Catalog;
use crate::config::ReferencePoint;
use crate::geo::distance_km;
use crate::{RankedStation, Station};

/// Rank stations by distance from `(ref_lat, ref_lng)`.
///
/// Returns at most `limit` stations within `max_radius_km`, closest first.
/// Equal distances keep catalog order. When nothing lies inside the radius
/// the closest `limit` stations are returned regardless of distance, so a
/// non-empty catalog always yields a non-empty result for `limit > 0`.
pub fn rank(
    catalog: &Catalog,
    ref_lat: f64,
    ref_lng: f64,
    limit: usize,
    max_radius_km: f64,
) -> Vec<RankedStation> {
    if limit == 0 || catalog.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<RankedStation> = catalog
        .stations()
        .iter()
        .map(|station| RankedStation {
            distance_km: distance_km(ref_lat, ref_lng, station.lat, station.lng),
            station: station.clone(),
        })
        .collect();

    // sort_by is stable, ties stay in catalog order
    sorted.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    let within = sorted
        .iter()
        .take_while(|ranked| ranked.distance_km <= max_radius_km)
        .count();

    if within == 0 {
        sorted.truncate(limit);
    } else {
        sorted.truncate(within.min(limit));
    }
    sorted
}

/// Pick the station to show before the user has chosen one.
///
/// Preference order: the configured default id, then the first station whose
/// name mentions the reference point's place name, then the station nearest
/// to the reference point.
pub fn initial_station<'a>(
    catalog: &'a Catalog,
    default_id: &str,
    reference: &ReferencePoint,
) -> Option<&'a Station> {
    if let Ok(station) = catalog.station_by_id(default_id) {
        return Some(station);
    }

    let place = reference.place_name().to_lowercase();
    if !place.is_empty() {
        if let Some(station) = catalog
            .stations()
            .iter()
            .find(|station| station.name.to_lowercase().contains(&place))
        {
            return Some(station);
        }
    }

    let nearest = rank(catalog, reference.lat, reference.lng, 1, f64::INFINITY);
    let id = nearest.first()?.station.id.as_str();
    catalog.station_by_id(id).ok()
}
