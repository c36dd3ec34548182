//! Route fetching with persistent memoization and an offline fallback.
//!
//! `route()` is deliberately infallible: a memoized geometry, the routing
//! service, and finally a synthetic straight-line estimate are tried in that
//! order, so callers always receive something drivable. Only the synthetic
//! fallback is withheld from the memo store, which lets the next request for
//! the same pair retry the network.

use std::sync::Arc;

use rand::Rng;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::geo::{haversine_km, Coordinate};
use crate::routing::http::HttpClient;
use crate::routing::types::{
    DirectionsResponse, RouteGeometry, RoutingError, AVERAGE_SPEED_MPS,
};
use crate::storage::{route_key, route_timestamp_key, Storage};

/// Default routing service endpoint.
pub const DEFAULT_OPENROUTE_BASE: &str = "https://api.openrouteservice.org/v2";

/// Maximum jitter (degrees) applied to the fallback route midpoint.
const FALLBACK_JITTER_DEG: f64 = 0.005;

/// Fetches driving routes, memoizing successful results in storage.
pub struct RoutingClient {
    http: Arc<dyn HttpClient>,
    storage: Arc<dyn Storage>,
    base_url: String,
    api_key: String,
}

impl RoutingClient {
    /// Create a routing client against the default service endpoint.
    pub fn new(http: Arc<dyn HttpClient>, storage: Arc<dyn Storage>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, storage, api_key, DEFAULT_OPENROUTE_BASE)
    }

    /// Create a routing client against a custom endpoint (tests, proxies).
    pub fn with_base_url(
        http: Arc<dyn HttpClient>,
        storage: Arc<dyn Storage>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            storage,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Compute a driving route between two coordinates.
    ///
    /// Never fails: on any transport or payload problem a synthetic 3-point
    /// geometry is returned instead, estimated at [`AVERAGE_SPEED_MPS`].
    pub async fn route(&self, start: &Coordinate, end: &Coordinate) -> RouteGeometry {
        let key = route_key(start, end);

        if let Some(geometry) = self.memoized(&key) {
            debug!(key, "serving memoized route");
            return geometry;
        }

        match self.fetch_route(start, end).await {
            Ok(geometry) => {
                self.memoize(&key, start, end, &geometry);
                geometry
            }
            Err(e) => {
                warn!(error = %e, "routing failed, synthesizing fallback geometry");
                Self::fallback_geometry(start, end)
            }
        }
    }

    /// Look up a previously memoized, well-formed geometry.
    fn memoized(&self, key: &str) -> Option<RouteGeometry> {
        let raw = self.storage.get(key).ok().flatten()?;
        match serde_json::from_str::<RouteGeometry>(&raw) {
            Ok(geometry) if geometry.is_well_formed() => Some(geometry),
            Ok(_) => {
                warn!(key, "ignoring degenerate memoized route");
                None
            }
            Err(e) => {
                // Corruption is treated as absence.
                warn!(key, error = %e, "ignoring unparseable memoized route");
                None
            }
        }
    }

    fn memoize(&self, key: &str, start: &Coordinate, end: &Coordinate, geometry: &RouteGeometry) {
        let Ok(raw) = serde_json::to_string(geometry) else {
            return;
        };
        if let Err(e) = self.storage.set(key, &raw) {
            warn!(key, error = %e, "failed to memoize route");
            return;
        }
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let _ = self
            .storage
            .set(&route_timestamp_key(start, end), &timestamp);
        info!(key, vertices = geometry.coordinates.len(), "memoized route");
    }

    async fn fetch_route(
        &self,
        start: &Coordinate,
        end: &Coordinate,
    ) -> Result<RouteGeometry, RoutingError> {
        let url = format!("{}/directions/driving-car", self.base_url);
        // OpenRouteService takes (lon, lat) pairs.
        let body = json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]],
            "format": "geojson",
        });
        let headers = [("Authorization".to_string(), self.api_key.clone())];

        let response = self.http.post_json(&url, &headers, body).await?;
        let parsed: DirectionsResponse = response
            .json()
            .map_err(|e| RoutingError::MalformedResponse(e.to_string()))?;

        let feature = parsed
            .features
            .first()
            .ok_or_else(|| RoutingError::MalformedResponse("no route features".to_string()))?;
        if feature.geometry.coordinates.len() < 2 {
            return Err(RoutingError::MalformedResponse(
                "geometry has fewer than 2 points".to_string(),
            ));
        }

        Ok(RouteGeometry {
            coordinates: feature
                .geometry
                .coordinates
                .iter()
                .map(|&[lon, lat]| Coordinate::new(lat, lon))
                .collect(),
            distance_meters: feature.properties.summary.distance,
            duration_seconds: feature.properties.summary.duration,
        })
    }

    /// Straight-line estimate used when the routing service is unreachable.
    ///
    /// Three points: start, a jittered midpoint, end. The jitter keeps
    /// repeated fallbacks from rendering as identical overlapping lines.
    fn fallback_geometry(start: &Coordinate, end: &Coordinate) -> RouteGeometry {
        let mut rng = rand::rng();
        let midpoint = start.midpoint(end);
        let jittered = Coordinate::new(
            midpoint.lat + rng.random_range(-FALLBACK_JITTER_DEG..FALLBACK_JITTER_DEG),
            midpoint.lon + rng.random_range(-FALLBACK_JITTER_DEG..FALLBACK_JITTER_DEG),
        );

        let distance_meters = haversine_km(start, end) * 1000.0;
        RouteGeometry {
            coordinates: vec![*start, jittered, *end],
            distance_meters,
            duration_seconds: distance_meters / AVERAGE_SPEED_MPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::http::tests::MockHttpClient;
    use crate::storage::MemoryStorage;

    const ORS_BODY: &str = r#"{
        "features": [{
            "geometry": {"coordinates": [[-74.0, 40.0], [-74.05, 40.05], [-74.1, 40.1]]},
            "properties": {"summary": {"distance": 14200.0, "duration": 947.0}}
        }]
    }"#;

    fn client(http: MockHttpClient) -> (Arc<MemoryStorage>, RoutingClient) {
        let storage = Arc::new(MemoryStorage::new());
        let client = RoutingClient::new(Arc::new(http), storage.clone(), "test-key");
        (storage, client)
    }

    #[tokio::test]
    async fn test_successful_route_is_memoized() {
        let (storage, client) = client(MockHttpClient::ok(ORS_BODY));
        let start = Coordinate::new(40.0, -74.0);
        let end = Coordinate::new(40.1, -74.1);

        let geometry = client.route(&start, &end).await;
        assert_eq!(geometry.coordinates.len(), 3);
        // Service coordinates come back converted to (lat, lon).
        assert_eq!(geometry.coordinates[0], Coordinate::new(40.0, -74.0));
        assert_eq!(geometry.distance_meters, 14200.0);

        assert!(storage.get("route_40_-74_40.1_-74.1").unwrap().is_some());
        assert!(storage
            .get("route_timestamp_route_40_-74_40.1_-74.1")
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_memoized_route_short_circuits_network() {
        let http = Arc::new(MockHttpClient::ok(ORS_BODY));
        let storage = Arc::new(MemoryStorage::new());
        let client = RoutingClient::new(http.clone(), storage, "test-key");
        let start = Coordinate::new(40.0, -74.0);
        let end = Coordinate::new(40.1, -74.1);

        client.route(&start, &end).await;
        let first_calls = http.requests.lock().len();
        client.route(&start, &end).await;
        assert_eq!(
            http.requests.lock().len(),
            first_calls,
            "second call must not touch the network"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_yields_fallback() {
        let (storage, client) = client(MockHttpClient::failing());
        let start = Coordinate::new(40.0, -74.0);
        let end = Coordinate::new(40.1, -74.1);

        let geometry = client.route(&start, &end).await;
        assert_eq!(geometry.coordinates.len(), 3);
        assert_eq!(geometry.coordinates[0], start);
        assert_eq!(geometry.coordinates[2], end);

        let expected = haversine_km(&start, &end) * 1000.0;
        assert!((geometry.distance_meters - expected).abs() < 1e-6);
        assert!((geometry.duration_seconds - expected / 15.0).abs() < 1e-6);

        // Midpoint jitter stays within tolerance.
        let midpoint = start.midpoint(&end);
        assert!((geometry.coordinates[1].lat - midpoint.lat).abs() <= FALLBACK_JITTER_DEG);
        assert!((geometry.coordinates[1].lon - midpoint.lon).abs() <= FALLBACK_JITTER_DEG);

        // Fallbacks are not authoritative and must not be memoized.
        assert!(storage.get("route_40_-74_40.1_-74.1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_yields_fallback() {
        let (_, client) = client(MockHttpClient::ok(r#"{"features": []}"#));
        let start = Coordinate::new(40.0, -74.0);
        let end = Coordinate::new(40.1, -74.1);

        let geometry = client.route(&start, &end).await;
        assert_eq!(geometry.coordinates.len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_memo_entry_is_refetched() {
        let http = Arc::new(MockHttpClient::ok(ORS_BODY));
        let storage = Arc::new(MemoryStorage::new());
        storage.set("route_40_-74_40.1_-74.1", "{broken").unwrap();
        let client = RoutingClient::new(http.clone(), storage, "test-key");

        let geometry = client
            .route(&Coordinate::new(40.0, -74.0), &Coordinate::new(40.1, -74.1))
            .await;
        assert_eq!(geometry.distance_meters, 14200.0);
        assert_eq!(http.requests.lock().len(), 1, "network refetch expected");
    }
}
