//! Turn-by-turn navigation
//!
//! Converts route geometry into discrete instructions and tracks a moving
//! observer's progress against them: step synthesis, the session state
//! machine, and position acquisition settings.

mod position;
mod steps;
mod tracker;
mod types;

pub use position::{
    AcquisitionConfig, ACQUISITION_TIMEOUT, CONTINUOUS_MAX_AGE, ONE_SHOT_MAX_AGE,
};
pub use steps::synthesize_steps;
pub use tracker::{ProgressTracker, ProgressUpdate, ARRIVAL_LINGER, ARRIVAL_THRESHOLD_M};
pub use types::{Maneuver, NavigationSession, NavigationStep};
