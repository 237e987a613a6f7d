//! # Great-Circle Distance
//!
//! Haversine distance on a spherical Earth. Accurate to well under 1% for the
//! station-picking distances this crate deals with.

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres to statute miles
const MILES_PER_KM: f64 = 0.621371;

/// Great-circle distance in kilometres between two points given in degrees.
///
/// Symmetric in its arguments and zero for identical points. NaN inputs
/// produce NaN rather than panicking; callers are expected to only pass
/// coordinates that survived catalog normalization.
///
/// # Example
/// ```
/// use tide_finder_lib::geo::distance_km;
///
/// // Santa Monica to San Francisco
/// let d = distance_km(34.008, -118.5, 37.806, -122.465);
/// assert!((540.0..560.0).contains(&d));
/// ```
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        let scale = a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= 1e-9 * scale, "{a} != {b}");
    }

    #[test]
    fn test_identical_points_are_zero() {
        for &(lat, lng) in &[(0.0, 0.0), (34.008, -118.5), (-89.9, 179.9), (90.0, -180.0)] {
            assert_eq!(distance_km(lat, lng, lat, lng), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ((34.008, -118.5), (37.806, -122.465)),
            ((-33.86, 151.21), (51.5, -0.12)),
            ((0.0, 179.5), (0.0, -179.5)),
        ];
        for ((a_lat, a_lng), (b_lat, b_lng)) in pairs {
            assert_close(
                distance_km(a_lat, a_lng, b_lat, b_lng),
                distance_km(b_lat, b_lng, a_lat, a_lng),
            );
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2 * pi * R / 360
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert_close(distance_km(10.0, 20.0, 11.0, 20.0), expected);
    }

    #[test]
    fn test_antimeridian_is_short_way_round() {
        let d = distance_km(0.0, 179.5, 0.0, -179.5);
        assert!(d < 112.0, "crossing the antimeridian gave {d} km");
    }

    #[test]
    fn test_nan_does_not_panic() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_km_to_miles() {
        assert!((km_to_miles(100.0) - 62.1371).abs() < 1e-9);
    }
}
