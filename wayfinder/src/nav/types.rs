//! Navigation step and session types.
//!
//! These are the persisted schemas for turn-by-turn state; the session
//! snapshot is written verbatim to storage and rehydrated on cold start.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Coarse maneuver classification for a step.
///
/// Derived from bearing deltas between adjacent segments, not from road
/// graph data, so treat it as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maneuver {
    Straight,
    TurnLeft,
    TurnRight,
    Roundabout,
    Destination,
}

/// A single turn-by-turn instruction covering one geometry segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStep {
    /// Human-readable instruction text.
    pub instruction: String,
    /// Segment length in meters.
    pub distance_meters: f64,
    /// Estimated segment travel time in seconds.
    pub duration_seconds: f64,
    /// Coarse maneuver classification.
    pub maneuver: Maneuver,
    /// Segment end coordinate; arrival at this point completes the step.
    pub target: Coordinate,
}

/// Snapshot of an in-progress navigation session.
///
/// Invariant while active: `current_index < steps.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSession {
    /// Ordered instruction sequence.
    pub steps: Vec<NavigationStep>,
    /// Index of the step currently being driven.
    pub current_index: usize,
    /// Whether the session is live.
    pub is_active: bool,
}

impl NavigationSession {
    /// The step currently being driven.
    pub fn current_step(&self) -> Option<&NavigationStep> {
        self.steps.get(self.current_index)
    }

    /// The step after the current one, if any.
    pub fn next_step(&self) -> Option<&NavigationStep> {
        self.steps.get(self.current_index + 1)
    }
}
