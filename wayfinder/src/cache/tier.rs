//! Cache tiers, versioned tier names, and request classification.
//!
//! Every request is routed to exactly one tier by resource kind and target
//! host, and each tier is handled by a fixed fetch strategy. Tier names
//! carry a version suffix; bumping a version on deploy orphans the old name
//! so activation can sweep it away.

use super::types::{Request, ResourceKind};

/// A named partition of cached responses with its own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Application shell: documents, scripts, styles.
    AppShell,
    /// Map tile responses.
    TileCache,
    /// Geocoding and routing responses.
    RouteCache,
    /// Everything else.
    Default,
}

/// How a tier's requests are satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Serve from cache when present, touching the network only on a miss.
    CacheFirst,
    /// Try the network, falling back to cache on failure.
    NetworkFirst,
}

/// The strategy table: tier to fetch strategy.
pub fn strategy_for(tier: CacheTier) -> FetchStrategy {
    match tier {
        CacheTier::AppShell => FetchStrategy::CacheFirst,
        CacheTier::TileCache | CacheTier::RouteCache | CacheTier::Default => {
            FetchStrategy::NetworkFirst
        }
    }
}

/// Hosts serving map tiles.
const TILE_HOSTS: &[&str] = &["tile.openstreetmap.org"];

/// Hosts serving geocoding and routing.
const ROUTE_HOSTS: &[&str] = &["nominatim.openstreetmap.org", "api.openrouteservice.org"];

/// Classify a request into its cache tier.
///
/// Shell resources go by kind; data requests go by host. Routing hosts are
/// checked before tile hosts because both live under openstreetmap.org.
pub fn classify(request: &Request) -> CacheTier {
    match request.kind {
        ResourceKind::Document | ResourceKind::Script | ResourceKind::Style => {
            return CacheTier::AppShell
        }
        _ => {}
    }

    let url = request.url.as_str();
    if ROUTE_HOSTS.iter().any(|host| url.contains(host)) {
        CacheTier::RouteCache
    } else if TILE_HOSTS.iter().any(|host| url.contains(host)) {
        CacheTier::TileCache
    } else {
        CacheTier::Default
    }
}

/// The current versioned name of each tier.
///
/// Bump a version here on deploy to invalidate that tier; `activate`
/// deletes every stored tier whose name is no longer in this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSet {
    pub app_shell: String,
    pub tiles: String,
    pub routes: String,
    pub default_tier: String,
}

impl Default for TierSet {
    fn default() -> Self {
        Self {
            app_shell: "app-shell-v1".to_string(),
            tiles: "tiles-v1".to_string(),
            routes: "routes-v1".to_string(),
            default_tier: "default-v1".to_string(),
        }
    }
}

impl TierSet {
    /// The versioned name for a tier.
    pub fn name(&self, tier: CacheTier) -> &str {
        match tier {
            CacheTier::AppShell => &self.app_shell,
            CacheTier::TileCache => &self.tiles,
            CacheTier::RouteCache => &self.routes,
            CacheTier::Default => &self.default_tier,
        }
    }

    /// All current tier names.
    pub fn all(&self) -> [&str; 4] {
        [
            &self.app_shell,
            &self.tiles,
            &self.routes,
            &self.default_tier,
        ]
    }
}
