//! Great-circle distance and bearing primitives
//!
//! Every distance computation in the engine goes through [`haversine_km`];
//! no other module carries its own distance formula.

mod types;

pub use types::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers.
///
/// Standard haversine formula over a spherical Earth of radius
/// [`EARTH_RADIUS_KM`]. Total over all valid coordinate pairs;
/// `haversine_km(a, a)` is exactly 0.
///
/// # Arguments
///
/// * `a` - Start coordinate in degrees
/// * `b` - End coordinate in degrees
#[inline]
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Forward azimuth from `a` toward `b` in degrees, normalized to `[0, 360)`.
///
/// 0 = north, 90 = east. Uses the standard two-argument-arctangent spherical
/// bearing formula; identical coordinates yield 0 without any special case
/// (atan2(0, 0) is 0).
#[inline]
pub fn bearing_deg(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_identical_points() {
        let nyc = Coordinate::new(40.7128, -74.0060);
        assert_eq!(haversine_km(&nyc, &nyc), 0.0);
    }

    #[test]
    fn test_nyc_to_boston_distance() {
        // Known distance is roughly 306 km
        let nyc = Coordinate::new(40.7128, -74.0060);
        let boston = Coordinate::new(42.3601, -71.0589);
        let d = haversine_km(&nyc, &boston);
        assert!((d - 306.0).abs() < 5.0, "Expected ~306 km, got {}", d);
    }

    #[test]
    fn test_bearing_due_north() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(41.0, -74.0);
        let bearing = bearing_deg(&a, &b);
        assert!(bearing.abs() < 0.01, "Expected ~0, got {}", bearing);
    }

    #[test]
    fn test_bearing_due_east_at_equator() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let bearing = bearing_deg(&a, &b);
        assert!((bearing - 90.0).abs() < 0.01, "Expected ~90, got {}", bearing);
    }

    #[test]
    fn test_bearing_identical_points_is_zero() {
        let a = Coordinate::new(40.0, -74.0);
        assert_eq!(bearing_deg(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(48.8566, 2.3522);
        let b = Coordinate::new(52.5200, 13.4050);
        let ab = haversine_km(&a, &b);
        let ba = haversine_km(&b, &a);
        assert!((ab - ba).abs() < 1e-9);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let c = Coordinate::new(lat, lon);
                prop_assert_eq!(haversine_km(&c, &c), 0.0);
            }

            #[test]
            fn test_distance_non_negative(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);
                prop_assert!(haversine_km(&a, &b) >= 0.0);
            }

            #[test]
            fn test_bearing_always_in_range(
                lat1 in -89.0..89.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -89.0..89.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);
                let bearing = bearing_deg(&a, &b);
                prop_assert!(
                    (0.0..360.0).contains(&bearing),
                    "Bearing {} outside [0, 360)",
                    bearing
                );
            }

            #[test]
            fn test_distance_bounded_by_half_circumference(
                lat1 in -90.0..90.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -90.0..90.0_f64,
                lon2 in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);
                // No two points on a sphere are farther apart than half
                // the circumference.
                let max = std::f64::consts::PI * EARTH_RADIUS_KM;
                prop_assert!(haversine_km(&a, &b) <= max + 1e-6);
            }
        }
    }
}
