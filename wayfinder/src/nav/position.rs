//! Position acquisition configuration.
//!
//! The engine consumes position samples from an external source (GPS,
//! platform geolocation). These constants describe how patiently the caller
//! should wait for a fix and how stale a cached fix may be; they are fixed
//! configuration, not computed values.

use std::time::Duration;

/// How long to wait for a position fix before giving up.
pub const ACQUISITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum acceptable fix age while continuously tracking.
pub const CONTINUOUS_MAX_AGE: Duration = Duration::from_secs(1);

/// Maximum acceptable fix age for a one-shot lookup.
pub const ONE_SHOT_MAX_AGE: Duration = Duration::from_secs(300);

/// Settings handed to the platform position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionConfig {
    /// Give up waiting for a fix after this long.
    pub timeout: Duration,
    /// Accept a cached fix no older than this.
    pub maximum_age: Duration,
    /// Request the highest accuracy the platform offers.
    pub high_accuracy: bool,
}

impl AcquisitionConfig {
    /// Configuration for continuous turn-by-turn tracking: fresh fixes only.
    pub fn continuous() -> Self {
        Self {
            timeout: ACQUISITION_TIMEOUT,
            maximum_age: CONTINUOUS_MAX_AGE,
            high_accuracy: true,
        }
    }

    /// Configuration for a one-shot "where am I" lookup, where a fix a few
    /// minutes old is still useful.
    pub fn one_shot() -> Self {
        Self {
            timeout: ACQUISITION_TIMEOUT,
            maximum_age: ONE_SHOT_MAX_AGE,
            high_accuracy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_requires_fresh_fixes() {
        let config = AcquisitionConfig::continuous();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.maximum_age, Duration::from_secs(1));
    }

    #[test]
    fn test_one_shot_tolerates_stale_fixes() {
        let config = AcquisitionConfig::one_shot();
        assert_eq!(config.maximum_age, Duration::from_secs(300));
    }
}
