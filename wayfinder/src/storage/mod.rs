//! Key-value persistence port
//!
//! Navigation state, memoized routes, and the voice preference are persisted
//! through the [`Storage`] trait so the state machines never touch a concrete
//! platform store directly. Values are JSON strings; the schemas live with
//! the types that own them.
//!
//! Corrupted or missing values are always treated as absence by callers,
//! never as a fatal error.

mod disk;
mod memory;

pub use disk::FileStorage;
pub use memory::MemoryStorage;

use crate::geo::Coordinate;
use thiserror::Error;

/// Key holding the most recently planned route record.
pub const CURRENT_ROUTE_KEY: &str = "current-route";

/// Key holding the active navigation session snapshot.
pub const NAVIGATION_SESSION_KEY: &str = "navigation-session";

/// Key holding the persisted voice-guidance preference.
pub const VOICE_ENABLED_KEY: &str = "voice-enabled";

/// Memoization key for a routed (start, end) coordinate pair.
pub fn route_key(start: &Coordinate, end: &Coordinate) -> String {
    format!("route_{}_{}_{}_{}", start.lat, start.lon, end.lat, end.lon)
}

/// Key holding the epoch-millisecond timestamp for a memoized route.
pub fn route_timestamp_key(start: &Coordinate, end: &Coordinate) -> String {
    format!("route_timestamp_{}", route_key(start, end))
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error from a disk-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing directory could not be determined.
    #[error("No usable data directory")]
    NoDataDir,
}

/// Minimal key-value persistence interface.
///
/// Implementations must be `Send + Sync`; the progress tracker and routing
/// client share a store across async tasks via `Arc<dyn Storage>`.
pub trait Storage: Send + Sync {
    /// Retrieve the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
