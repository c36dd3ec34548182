//! Geographic coordinate value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in degrees.
///
/// Latitude is positive north, longitude positive east. The type is a plain
/// immutable value; validation of ranges is left to the producers (service
/// responses, user input parsing) since every formula in [`crate::geo`]
/// degrades gracefully on out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic midpoint of two coordinates.
    ///
    /// A flat-earth approximation, accurate enough for the short synthetic
    /// fallback routes it is used for.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_is_halfway() {
        let a = Coordinate::new(40.0, -74.0);
        let b = Coordinate::new(42.0, -70.0);
        let mid = a.midpoint(&b);
        assert_eq!(mid.lat, 41.0);
        assert_eq!(mid.lon, -72.0);
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let c = Coordinate::new(40.7128, -74.006);
        assert_eq!(format!("{}", c), "40.7128,-74.0060");
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = Coordinate::new(51.5074, -0.1278);
        let json = serde_json::to_string(&c).unwrap();
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
