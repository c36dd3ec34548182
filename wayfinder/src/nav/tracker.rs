//! Turn-by-turn progress tracking state machine.
//!
//! Idle -> Active -> Idle. A tracker consumes live position samples,
//! advances through the step list as each target comes within the arrival
//! threshold, announces transitions, and persists a snapshot so a session
//! survives restarts. Position samples must be fed strictly in arrival
//! order by a single logical caller; the tracker itself is not re-entrant.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::announce::AnnouncementChannel;
use crate::geo::{haversine_km, Coordinate};
use crate::nav::steps::synthesize_steps;
use crate::nav::types::{Maneuver, NavigationSession, NavigationStep};
use crate::routing::RouteGeometry;
use crate::storage::{Storage, NAVIGATION_SESSION_KEY};

/// Proximity to a step target that completes the step, in meters.
pub const ARRIVAL_THRESHOLD_M: f64 = 50.0;

/// Grace period between reaching the destination step and automatic
/// session teardown, giving observers and the arrival announcement time
/// to register.
pub const ARRIVAL_LINGER: Duration = Duration::from_secs(3);

/// Progress report returned for every position sample while active.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// The step currently being driven (after any advance).
    pub current_step: NavigationStep,
    /// The step after the current one, if any.
    pub next_step: Option<NavigationStep>,
    /// Distance from the sampled position to the current step's target,
    /// in meters.
    pub distance_to_next: f64,
    /// Whether this sample advanced the session to a new step.
    pub advanced: bool,
}

/// Session state machine for an in-progress navigation attempt.
pub struct ProgressTracker {
    storage: Arc<dyn Storage>,
    channel: Arc<AnnouncementChannel>,
    session: Option<NavigationSession>,
    auto_stop_at: Option<Instant>,
}

impl ProgressTracker {
    /// Create an idle tracker with injected storage and announcements.
    pub fn new(storage: Arc<dyn Storage>, channel: Arc<AnnouncementChannel>) -> Self {
        Self {
            storage,
            channel,
            session: None,
            auto_stop_at: None,
        }
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active)
    }

    /// The live session snapshot, if any.
    pub fn session(&self) -> Option<&NavigationSession> {
        self.session.as_ref()
    }

    /// Start a session from a route geometry.
    ///
    /// Synthesizes the step list, persists the snapshot, and announces the
    /// first instruction. A geometry too short to produce any steps leaves
    /// the tracker idle; returns whether a session actually started.
    pub fn start_session(&mut self, geometry: &RouteGeometry) -> bool {
        let steps = synthesize_steps(geometry);
        if steps.is_empty() {
            warn!("geometry too short to navigate, staying idle");
            return false;
        }

        let first_instruction = steps[0].instruction.clone();
        info!(steps = steps.len(), "navigation session started");
        self.session = Some(NavigationSession {
            steps,
            current_index: 0,
            is_active: true,
        });
        self.auto_stop_at = None;
        self.persist_snapshot();
        self.channel.announce(&first_instruction);
        true
    }

    /// Feed a live position sample.
    ///
    /// Returns `None` while idle. Advances to the next step when the
    /// current target is within [`ARRIVAL_THRESHOLD_M`] and a next step
    /// exists; reaching the destination step arms a one-shot auto-stop
    /// [`ARRIVAL_LINGER`] later.
    pub fn update_position(&mut self, position: &Coordinate) -> Option<ProgressUpdate> {
        self.update_position_at(position, Instant::now())
    }

    /// [`Self::update_position`] with an explicit clock, primarily for
    /// tests exercising the auto-stop delay.
    pub fn update_position_at(
        &mut self,
        position: &Coordinate,
        now: Instant,
    ) -> Option<ProgressUpdate> {
        if self.finish_if_due_at(now) {
            return None;
        }

        let session = match &mut self.session {
            Some(session) if session.is_active => session,
            _ => return None,
        };

        let current = session.current_step()?.clone();
        let distance_to_next = haversine_km(position, &current.target) * 1000.0;

        let mut advanced = false;
        if distance_to_next < ARRIVAL_THRESHOLD_M && session.next_step().is_some() {
            session.current_index += 1;
            advanced = true;
            let instruction = session
                .current_step()
                .map(|s| s.instruction.clone())
                .unwrap_or_default();
            debug!(
                index = session.current_index,
                distance_m = distance_to_next,
                "advanced to next step"
            );
            self.persist_snapshot();
            self.channel.announce(&instruction);
        }

        let session = self.session.as_ref()?;
        let current_step = session.current_step()?.clone();
        let next_step = session.next_step().cloned();

        // Reaching the destination step arms teardown once; repeated
        // samples must not push the deadline out.
        if current_step.maneuver == Maneuver::Destination && self.auto_stop_at.is_none() {
            info!("destination reached, scheduling session stop");
            self.auto_stop_at = Some(now + ARRIVAL_LINGER);
        }

        Some(ProgressUpdate {
            current_step,
            next_step,
            distance_to_next,
            advanced,
        })
    }

    /// Stop the session if the armed auto-stop deadline has passed.
    ///
    /// Returns whether the session was stopped by this call. Callers with a
    /// timer can poll this between position samples.
    pub fn finish_if_due(&mut self) -> bool {
        self.finish_if_due_at(Instant::now())
    }

    /// [`Self::finish_if_due`] with an explicit clock.
    pub fn finish_if_due_at(&mut self, now: Instant) -> bool {
        match self.auto_stop_at {
            Some(deadline) if now >= deadline => {
                self.stop_session();
                true
            }
            _ => false,
        }
    }

    /// Tear down the session: clears the snapshot and cancels any in-flight
    /// announcement. Idempotent; outstanding network work is unaffected.
    pub fn stop_session(&mut self) {
        if self.session.take().is_some() {
            info!("navigation session stopped");
        }
        self.auto_stop_at = None;
        if let Err(e) = self.storage.remove(NAVIGATION_SESSION_KEY) {
            warn!(error = %e, "failed to clear session snapshot");
        }
        self.channel.cancel();
    }

    /// Rehydrate a persisted session on cold start.
    ///
    /// Adopts the stored steps and index verbatim, without re-running
    /// synthesis. A missing, unreadable, inactive, or inconsistent snapshot
    /// leaves the tracker idle; returns whether a session was resumed.
    pub fn resume_from_storage(&mut self) -> bool {
        let raw = match self.storage.get(NAVIGATION_SESSION_KEY) {
            Ok(Some(raw)) => raw,
            _ => return false,
        };

        let session: NavigationSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "ignoring corrupt session snapshot");
                return false;
            }
        };

        if !session.is_active || session.current_index >= session.steps.len() {
            debug!("stored session not resumable");
            return false;
        }

        info!(
            steps = session.steps.len(),
            index = session.current_index,
            "resumed navigation session"
        );
        self.session = Some(session);
        self.auto_stop_at = None;
        true
    }

    fn persist_snapshot(&self) {
        let Some(session) = &self.session else {
            return;
        };
        let Ok(raw) = serde_json::to_string(session) else {
            return;
        };
        if let Err(e) = self.storage.set(NAVIGATION_SESSION_KEY, &raw) {
            warn!(error = %e, "failed to persist session snapshot");
        }
    }
}
