//! Place-name to coordinate resolution.
//!
//! Resolution order: raw `"lat, lon"` input parses directly with no network
//! call, then the geocoding service is asked, then a small offline table of
//! well-known cities answers when the network cannot. Only a miss on all
//! three surfaces an error.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::geo::Coordinate;
use crate::routing::http::HttpClient;
use crate::routing::types::{GeocodeError, NominatimPlace};

/// Default geocoding service endpoint.
pub const DEFAULT_NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

/// Offline fallback table of well-known places.
///
/// Matched case-insensitively against the trimmed query when the service is
/// unreachable or returns nothing usable.
const FALLBACK_PLACES: &[(&str, f64, f64)] = &[
    ("new york", 40.7128, -74.0060),
    ("boston", 42.3601, -71.0589),
    ("philadelphia", 39.9526, -75.1652),
    ("washington", 38.9072, -77.0369),
    ("miami", 25.7617, -80.1918),
    ("chicago", 41.8781, -87.6298),
    ("los angeles", 34.0522, -118.2437),
    ("san francisco", 37.7749, -122.4194),
    ("london", 51.5074, -0.1278),
    ("paris", 48.8566, 2.3522),
    ("berlin", 52.5200, 13.4050),
    ("tokyo", 35.6762, 139.6503),
];

/// Resolves free-text place queries to coordinates.
pub struct Geocoder {
    http: Arc<dyn HttpClient>,
    base_url: String,
    coord_pattern: Regex,
}

impl Geocoder {
    /// Create a geocoder against the default service endpoint.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_base_url(http, DEFAULT_NOMINATIM_BASE)
    }

    /// Create a geocoder against a custom endpoint (tests, proxies).
    pub fn with_base_url(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            // "number, number" anywhere in the query counts as literal
            // coordinates.
            coord_pattern: Regex::new(r"([-+]?\d*\.?\d+),\s*([-+]?\d*\.?\d+)")
                .expect("coordinate pattern is a valid regex"),
        }
    }

    /// Resolve a place-name query to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NotFound`] only when the query is resolvable
    /// neither by the service nor by the offline fallback table. Transport
    /// failures alone never surface.
    pub async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        if let Some(coordinate) = self.parse_literal(query) {
            debug!(%coordinate, "query parsed as literal coordinates");
            return Ok(coordinate);
        }

        match self.query_service(query).await {
            Some(coordinate) => Ok(coordinate),
            None => self.fallback(query),
        }
    }

    /// Parse a `"lat, lon"` query without touching the network.
    fn parse_literal(&self, query: &str) -> Option<Coordinate> {
        let caps = self.coord_pattern.captures(query)?;
        let lat = caps.get(1)?.as_str().parse().ok()?;
        let lon = caps.get(2)?.as_str().parse().ok()?;
        Some(Coordinate::new(lat, lon))
    }

    async fn query_service(&self, query: &str) -> Option<Coordinate> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[("format", "json"), ("q", query), ("limit", "1")],
        )
        .ok()?;

        let response = match self.http.get(url.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(query, error = %e, "geocoding request failed, trying fallback table");
                return None;
            }
        };

        let places: Vec<NominatimPlace> = response.json().ok()?;
        let first = places.first()?;
        let lat = first.lat.parse().ok()?;
        let lon = first.lon.parse().ok()?;
        Some(Coordinate::new(lat, lon))
    }

    fn fallback(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let normalized = query.trim().to_lowercase();
        FALLBACK_PLACES
            .iter()
            .find(|(name, _, _)| *name == normalized)
            .map(|(_, lat, lon)| Coordinate::new(*lat, *lon))
            .ok_or_else(|| GeocodeError::NotFound {
                query: query.to_string(),
            })
    }
}
