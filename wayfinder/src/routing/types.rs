//! Route geometry and external service wire types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;
use crate::routing::http::HttpError;

/// Assumed average driving speed in meters per second.
///
/// Used for the constant-speed duration estimate in both the synthetic
/// fallback route and step synthesis. Not an ETA model.
pub const AVERAGE_SPEED_MPS: f64 = 15.0;

/// An ordered route polyline with aggregate distance and duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGeometry {
    /// Polyline vertices, start to end. At least 2 under normal operation.
    pub coordinates: Vec<Coordinate>,
    /// Total route length in meters.
    pub distance_meters: f64,
    /// Estimated travel time in seconds.
    pub duration_seconds: f64,
}

impl RouteGeometry {
    /// Whether a (possibly rehydrated) geometry is usable: at least two
    /// vertices and non-negative, finite aggregates.
    pub fn is_well_formed(&self) -> bool {
        self.coordinates.len() >= 2
            && self.distance_meters.is_finite()
            && self.distance_meters >= 0.0
            && self.duration_seconds.is_finite()
            && self.duration_seconds >= 0.0
    }
}

/// Errors from the routing fetch path.
///
/// These never escape [`crate::routing::RoutingClient::route`]; every
/// variant degrades to the synthetic fallback geometry.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Transport or HTTP status failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The service answered but the payload was not usable.
    #[error("malformed routing response: {0}")]
    MalformedResponse(String),
}

/// Geocoding failure surfaced to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum GeocodeError {
    /// The query matched neither the service nor the offline fallback table.
    #[error("no coordinates found for {query:?}")]
    NotFound { query: String },
}

// --- OpenRouteService directions wire format (GeoJSON subset) ---

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    pub features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsFeature {
    pub geometry: FeatureGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureGeometry {
    /// (lon, lat) pairs, per GeoJSON convention.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureProperties {
    pub summary: RouteSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteSummary {
    pub distance: f64,
    pub duration: f64,
}

// --- Nominatim search wire format ---

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
}
