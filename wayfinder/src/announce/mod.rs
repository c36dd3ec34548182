//! Voice announcement channel
//!
//! Speaks navigation instructions through an injected [`Announcer`] port.
//! The channel is single-slot: a new announcement always cancels whatever is
//! currently being spoken, so only the newest instruction is ever audible.
//! The enabled flag is persisted so the preference survives restarts;
//! while disabled, announcements are dropped but every other state
//! transition proceeds unaffected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::storage::{Storage, VOICE_ENABLED_KEY};

/// Fixed speech delivery parameters.
///
/// Matches the platform speech settings used for every utterance; there is
/// deliberately no per-announcement override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechParams {
    /// Speaking rate multiplier.
    pub rate: f32,
    /// Voice pitch multiplier.
    pub pitch: f32,
    /// Output volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

/// Platform speech capability port.
///
/// Implementations must be `Send + Sync`. `speak` is expected to return
/// promptly and deliver the utterance asynchronously; `cancel` silences any
/// utterance currently in progress.
pub trait Announcer: Send + Sync {
    /// Begin speaking `text` with the given delivery parameters.
    fn speak(&self, text: &str, params: &SpeechParams);

    /// Silence any utterance currently in progress.
    fn cancel(&self);
}

/// Announcer that emits instructions to the tracing log.
///
/// The default implementation for headless environments and the demo CLI,
/// where no real speech synthesis is available.
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn speak(&self, text: &str, params: &SpeechParams) {
        info!(rate = params.rate, volume = params.volume, "announce: {text}");
    }

    fn cancel(&self) {
        debug!("announcement cancelled");
    }
}

/// Single-slot, cancellable announcement channel.
pub struct AnnouncementChannel {
    announcer: Arc<dyn Announcer>,
    storage: Arc<dyn Storage>,
    params: SpeechParams,
    enabled: AtomicBool,
}

impl AnnouncementChannel {
    /// Create a channel, restoring the persisted enabled flag
    /// (defaults to enabled when absent or unreadable).
    pub fn new(announcer: Arc<dyn Announcer>, storage: Arc<dyn Storage>) -> Self {
        let enabled = match storage.get(VOICE_ENABLED_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or(true),
            _ => true,
        };
        Self {
            announcer,
            storage,
            params: SpeechParams::default(),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Speak `text`, cancelling any announcement already in progress.
    ///
    /// No-op while the channel is disabled.
    pub fn announce(&self, text: &str) {
        if !self.enabled.load(Ordering::Relaxed) {
            debug!("voice disabled, dropping announcement: {text}");
            return;
        }
        self.announcer.cancel();
        self.announcer.speak(text, &self.params);
    }

    /// Silence any in-flight announcement without changing the flag.
    pub fn cancel(&self) {
        self.announcer.cancel();
    }

    /// Whether announcements are currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Set and persist the enabled flag.
    pub fn set_enabled(&self, flag: bool) {
        self.enabled.store(flag, Ordering::Relaxed);
        // Preference persistence is best-effort; losing it only costs the
        // default on next start.
        let _ = self.storage.set(VOICE_ENABLED_KEY, if flag { "true" } else { "false" });
        if !flag {
            self.announcer.cancel();
        }
    }

    /// Flip the enabled flag, returning the new state.
    pub fn toggle(&self) -> bool {
        let next = !self.is_enabled();
        self.set_enabled(next);
        next
    }
}
