//! End-to-end navigation flow tests.
//!
//! These tests verify the complete offline path through the engine:
//! - literal-coordinate geocoding with no network
//! - routing under forced transport failure (synthetic fallback)
//! - step synthesis, session progress, and auto-termination
//!
//! Run with: `cargo test --test navigation_flow`

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use parking_lot::Mutex;

use wayfinder::announce::{AnnouncementChannel, Announcer, SpeechParams};
use wayfinder::geo::{haversine_km, Coordinate};
use wayfinder::nav::{Maneuver, ProgressTracker, ARRIVAL_LINGER};
use wayfinder::routing::http::{HttpClient, HttpError, HttpResponse};
use wayfinder::routing::{Geocoder, RoutingClient};
use wayfinder::storage::{MemoryStorage, Storage};

/// HTTP client whose network is always down.
struct DeadNetwork;

impl HttpClient for DeadNetwork {
    fn get(&self, _url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        Box::pin(async { Err(HttpError::Transport("network down".to_string())) })
    }

    fn post_json(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _body: serde_json::Value,
    ) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        Box::pin(async { Err(HttpError::Transport("network down".to_string())) })
    }
}

#[derive(Default)]
struct RecordingAnnouncer {
    spoken: Mutex<Vec<String>>,
}

impl Announcer for RecordingAnnouncer {
    fn speak(&self, text: &str, _params: &SpeechParams) {
        self.spoken.lock().push(text.to_string());
    }

    fn cancel(&self) {}
}

#[tokio::test]
async fn offline_plan_and_drive_to_destination() {
    let http: Arc<dyn HttpClient> = Arc::new(DeadNetwork);
    let storage = Arc::new(MemoryStorage::new());

    // Literal coordinates resolve without any network access.
    let geocoder = Geocoder::new(http.clone());
    let start = geocoder.geocode("40.0,-74.0").await.unwrap();
    let end = geocoder.geocode("40.1,-74.1").await.unwrap();
    assert_eq!(start, Coordinate::new(40.0, -74.0));
    assert_eq!(end, Coordinate::new(40.1, -74.1));

    // Routing under forced transport failure synthesizes a 3-point
    // geometry with the constant-speed duration estimate.
    let routing = RoutingClient::new(http, storage.clone(), "key");
    let geometry = routing.route(&start, &end).await;
    assert_eq!(geometry.coordinates.len(), 3);
    let expected_m = haversine_km(&start, &end) * 1000.0;
    assert!((geometry.distance_meters - expected_m).abs() < 1.0);
    assert!((geometry.duration_seconds - expected_m / 15.0).abs() < 0.1);

    // The 3-point geometry yields exactly two steps: straight, destination.
    let announcer = Arc::new(RecordingAnnouncer::default());
    let channel = Arc::new(AnnouncementChannel::new(announcer.clone(), storage));
    let mut tracker = ProgressTracker::new(Arc::new(MemoryStorage::new()), channel);
    assert!(tracker.start_session(&geometry));
    let steps = tracker.session().unwrap().steps.clone();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].maneuver, Maneuver::Straight);
    assert_eq!(steps[1].maneuver, Maneuver::Destination);

    // Drive: arrive at the midpoint target, then at the destination.
    let t0 = Instant::now();
    let update = tracker
        .update_position_at(&steps[0].target, t0)
        .expect("active session");
    assert!(update.advanced);
    assert_eq!(update.current_step.maneuver, Maneuver::Destination);

    let at_destination = tracker
        .update_position_at(&end, t0 + Duration::from_millis(500))
        .expect("still active in linger window");
    assert!(at_destination.distance_to_next < 1.0);

    // Termination fires after exactly the linger delay, not before.
    assert!(tracker.is_active());
    assert!(!tracker.finish_if_due_at(t0 + ARRIVAL_LINGER - Duration::from_millis(1)));
    assert!(tracker.finish_if_due_at(t0 + ARRIVAL_LINGER));
    assert!(!tracker.is_active());

    // Both instructions were announced along the way.
    let spoken = announcer.spoken.lock();
    assert_eq!(spoken.first().map(String::as_str), Some("Head toward your destination"));
    assert_eq!(spoken.last().map(String::as_str), Some("You have arrived"));
}

#[tokio::test]
async fn fallback_route_is_retried_on_next_request() {
    let storage = Arc::new(MemoryStorage::new());
    let routing = RoutingClient::new(Arc::new(DeadNetwork), storage.clone(), "key");
    let start = Coordinate::new(40.0, -74.0);
    let end = Coordinate::new(40.1, -74.1);

    routing.route(&start, &end).await;
    // Synthetic fallbacks are never memoized; a retry hits the network
    // again instead of replaying the estimate.
    assert!(storage.get("route_40_-74_40.1_-74.1").unwrap().is_none());
}
