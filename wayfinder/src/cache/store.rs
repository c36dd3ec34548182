//! Process-wide tier storage.
//!
//! Cached responses live in named tiers; any component may read, but only
//! the cache manager writes. Backed by concurrent maps so reads never block
//! the async runtime.

use dashmap::DashMap;

use super::types::Response;

/// In-memory store of cache tiers keyed by versioned tier name, each tier
/// keyed by request identity.
#[derive(Debug, Default)]
pub struct TierStore {
    tiers: DashMap<String, DashMap<String, Response>>,
}

impl TierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached response.
    pub fn get(&self, tier: &str, identity: &str) -> Option<Response> {
        self.tiers
            .get(tier)
            .and_then(|entries| entries.get(identity).map(|r| r.value().clone()))
    }

    /// Store a response copy, creating the tier if needed.
    pub fn put(&self, tier: &str, identity: &str, response: Response) {
        self.tiers
            .entry(tier.to_string())
            .or_default()
            .insert(identity.to_string(), response);
    }

    /// Whether an entry exists without cloning it out.
    pub fn contains(&self, tier: &str, identity: &str) -> bool {
        self.tiers
            .get(tier)
            .is_some_and(|entries| entries.contains_key(identity))
    }

    /// Delete an entire tier. Returns whether it existed.
    pub fn delete_tier(&self, tier: &str) -> bool {
        self.tiers.remove(tier).is_some()
    }

    /// Names of all tiers currently holding entries (or created empty).
    pub fn tier_names(&self) -> Vec<String> {
        self.tiers.iter().map(|t| t.key().clone()).collect()
    }

    /// Number of entries in a tier; 0 for an absent tier.
    pub fn entry_count(&self, tier: &str) -> usize {
        self.tiers.get(tier).map_or(0, |entries| entries.len())
    }
}
