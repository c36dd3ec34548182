//! Route planning facade.
//!
//! Ties geocoding and routing together for the UI flow: two place-name
//! strings in, a drivable geometry out, with the last planned route
//! persisted for offline rehydration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::geo::Coordinate;
use crate::routing::client::RoutingClient;
use crate::routing::geocoder::Geocoder;
use crate::routing::types::{GeocodeError, RouteGeometry};
use crate::storage::{Storage, CURRENT_ROUTE_KEY};

/// The persisted record of the most recently planned route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRouteRecord {
    /// Raw start query as entered.
    pub start: String,
    /// Raw end query as entered.
    pub end: String,
    /// Resolved start coordinate.
    pub start_coords: Coordinate,
    /// Resolved end coordinate.
    pub end_coords: Coordinate,
    /// The routed geometry.
    pub route: RouteGeometry,
    /// Epoch milliseconds at planning time.
    pub timestamp: i64,
}

/// Plans routes from free-text endpoint queries.
pub struct RoutePlanner {
    geocoder: Geocoder,
    routing: RoutingClient,
    storage: Arc<dyn Storage>,
}

impl RoutePlanner {
    pub fn new(geocoder: Geocoder, routing: RoutingClient, storage: Arc<dyn Storage>) -> Self {
        Self {
            geocoder,
            routing,
            storage,
        }
    }

    /// Geocode both endpoints, route between them, and persist the result.
    ///
    /// # Errors
    ///
    /// Only geocoding can fail outward; routing always produces a geometry.
    pub async fn plan(&self, start: &str, end: &str) -> Result<CurrentRouteRecord, GeocodeError> {
        let start_coords = self.geocoder.geocode(start).await?;
        let end_coords = self.geocoder.geocode(end).await?;

        let route = self.routing.route(&start_coords, &end_coords).await;
        info!(
            start,
            end,
            vertices = route.coordinates.len(),
            distance_m = route.distance_meters,
            "planned route"
        );

        let record = CurrentRouteRecord {
            start: start.to_string(),
            end: end.to_string(),
            start_coords,
            end_coords,
            route,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.persist(&record);
        Ok(record)
    }

    /// Rehydrate the last planned route, if a readable record exists.
    ///
    /// Corruption is treated as absence.
    pub fn cached_route(&self) -> Option<CurrentRouteRecord> {
        let raw = self.storage.get(CURRENT_ROUTE_KEY).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable current-route record");
                None
            }
        }
    }

    fn persist(&self, record: &CurrentRouteRecord) {
        let Ok(raw) = serde_json::to_string(record) else {
            return;
        };
        if let Err(e) = self.storage.set(CURRENT_ROUTE_KEY, &raw) {
            warn!(error = %e, "failed to persist current route");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::http::tests::MockHttpClient;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn planner(http: MockHttpClient) -> (Arc<MemoryStorage>, RoutePlanner) {
        let http = Arc::new(http);
        let storage = Arc::new(MemoryStorage::new());
        let planner = RoutePlanner::new(
            Geocoder::new(http.clone()),
            RoutingClient::new(http, storage.clone(), "test-key"),
            storage.clone(),
        );
        (storage, planner)
    }

    #[tokio::test]
    async fn test_plan_between_literal_coordinates_offline() {
        // Everything fails over the network; literal endpoints and the
        // synthetic fallback still make planning succeed.
        let (storage, planner) = planner(MockHttpClient::failing());

        let record = planner.plan("40.0,-74.0", "40.1,-74.1").await.unwrap();
        assert_eq!(record.start_coords, Coordinate::new(40.0, -74.0));
        assert_eq!(record.end_coords, Coordinate::new(40.1, -74.1));
        assert_eq!(record.route.coordinates.len(), 3);

        assert!(storage.get(CURRENT_ROUTE_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unresolvable_endpoint_fails_visibly() {
        let (_, planner) = planner(MockHttpClient::failing());
        let err = planner.plan("nowhere at all", "40.1,-74.1").await.unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cached_route_roundtrip() {
        let (_, planner) = planner(MockHttpClient::failing());
        planner.plan("new york", "boston").await.unwrap();

        let record = planner.cached_route().unwrap();
        assert_eq!(record.start, "new york");
        assert_eq!(record.end, "boston");
    }

    #[tokio::test]
    async fn test_corrupt_cached_route_is_absent() {
        let (storage, planner) = planner(MockHttpClient::failing());
        storage.set(CURRENT_ROUTE_KEY, "]][[").unwrap();
        assert!(planner.cached_route().is_none());
    }
}
