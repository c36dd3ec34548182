//! CLI command implementations.

use std::sync::Arc;
use std::time::Duration;

use wayfinder::announce::{AnnouncementChannel, LogAnnouncer};
use wayfinder::cache::{CacheManager, CachingHttpClient, ReqwestFetcher};
use wayfinder::nav::{Maneuver, ProgressTracker};
use wayfinder::routing::{GeocodeError, Geocoder, RoutePlanner, RoutingClient};
use wayfinder::storage::{FileStorage, MemoryStorage, Storage};

/// Errors reported to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not resolve location: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("could not set up HTTP stack: {0}")]
    Setup(String),
}

/// Build the planner over the cache interceptor so every geocoding and
/// routing call is replayable offline.
fn build_planner(api_key: &str, storage: Arc<dyn Storage>) -> Result<RoutePlanner, CliError> {
    let fetcher = ReqwestFetcher::new().map_err(|e| CliError::Setup(e.to_string()))?;
    let manager = Arc::new(CacheManager::new(Arc::new(fetcher)));
    manager.activate();
    let http = Arc::new(CachingHttpClient::new(manager));

    Ok(RoutePlanner::new(
        Geocoder::new(http.clone()),
        RoutingClient::new(http, storage.clone(), api_key),
        storage,
    ))
}

fn open_storage() -> Arc<dyn Storage> {
    match FileStorage::new() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "no data directory, state will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}

fn maneuver_glyph(maneuver: Maneuver) -> &'static str {
    match maneuver {
        Maneuver::Straight => "↑",
        Maneuver::TurnLeft => "←",
        Maneuver::TurnRight => "→",
        Maneuver::Roundabout => "↻",
        Maneuver::Destination => "⚑",
    }
}

/// Plan a route and print its steps.
pub async fn plan(start: &str, end: &str, api_key: &str) -> Result<(), CliError> {
    let storage = open_storage();
    let planner = build_planner(api_key, storage.clone())?;

    let record = planner.plan(start, end).await?;
    println!(
        "{} -> {}  ({:.1} km, ~{:.0} min)",
        record.start,
        record.end,
        record.route.distance_meters / 1000.0,
        record.route.duration_seconds / 60.0
    );

    let steps = wayfinder::nav::synthesize_steps(&record.route);
    for (i, step) in steps.iter().enumerate() {
        println!(
            "  {:>3}. {} {}  ({:.0} m)",
            i + 1,
            maneuver_glyph(step.maneuver),
            step.instruction,
            step.distance_meters
        );
    }
    Ok(())
}

/// Plan a route and replay it as a simulated drive.
pub async fn drive(start: &str, end: &str, api_key: &str, interval_ms: u64) -> Result<(), CliError> {
    let storage = open_storage();
    let planner = build_planner(api_key, storage.clone())?;
    let record = planner.plan(start, end).await?;

    let channel = Arc::new(AnnouncementChannel::new(
        Arc::new(LogAnnouncer),
        storage.clone(),
    ));
    let mut tracker = ProgressTracker::new(storage, channel);
    if !tracker.start_session(&record.route) {
        println!("route too short to navigate");
        return Ok(());
    }

    // Replay the route vertices as the live position stream.
    for position in &record.route.coordinates {
        if !tracker.is_active() {
            break;
        }
        if let Some(update) = tracker.update_position(position) {
            println!(
                "at {}  {} {}  ({:.0} m to next)",
                position,
                maneuver_glyph(update.current_step.maneuver),
                update.current_step.instruction,
                update.distance_to_next
            );
        }
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    }

    // Hold at the destination until the arrival linger elapses and the
    // session tears itself down.
    if let Some(destination) = record.route.coordinates.last() {
        while tracker.is_active() {
            tokio::time::sleep(Duration::from_millis(200)).await;
            tracker.update_position(destination);
            tracker.finish_if_due();
        }
    }
    println!("arrived");
    Ok(())
}
