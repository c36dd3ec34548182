//! The cache manager: per-tier fetch strategies and lifecycle.
//!
//! A single `handle` entry point intercepts every outbound request,
//! classifies it into a tier, and applies that tier's strategy. Tier writes
//! are fire-and-forget: the live response is returned without waiting for
//! the store to finish. Lifecycle mirrors an install/activate pair plus a
//! message side channel for warming additional URLs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::store::TierStore;
use super::tier::{classify, strategy_for, CacheTier, FetchStrategy, TierSet};
use super::types::{CacheError, Fetcher, Request, ResourceKind, Response};

/// Essential resources populated into the app shell on install.
pub const DEFAULT_APP_SHELL_MANIFEST: &[&str] = &[
    "/",
    "/assets/app.js",
    "/assets/app.css",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
];

/// Side-channel commands accepted by the interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Best-effort bulk add of additional URLs into the app shell.
    #[serde(rename = "CACHE_URLS")]
    CacheUrls { urls: Vec<String> },
}

/// Network-request interceptor with per-tier fetch strategies.
pub struct CacheManager {
    store: Arc<TierStore>,
    fetcher: Arc<dyn Fetcher>,
    tiers: TierSet,
    manifest: Vec<String>,
}

impl CacheManager {
    /// Create a manager with the default tier versions and shell manifest.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_config(
            fetcher,
            TierSet::default(),
            DEFAULT_APP_SHELL_MANIFEST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Create a manager with explicit tier names and manifest.
    pub fn with_config(fetcher: Arc<dyn Fetcher>, tiers: TierSet, manifest: Vec<String>) -> Self {
        Self {
            store: Arc::new(TierStore::new()),
            fetcher,
            tiers,
            manifest,
        }
    }

    /// The backing tier store (shared, read-only for callers).
    pub fn store(&self) -> &Arc<TierStore> {
        &self.store
    }

    /// Intercept one outbound request.
    ///
    /// Cache-first tiers never error: a miss with no network degrades to
    /// the cached root document (for document requests) or a synthesized
    /// 503. Network-first tiers propagate [`CacheError::Transport`] only
    /// when the network fails and nothing is cached.
    pub async fn handle(&self, request: &Request) -> Result<Response, CacheError> {
        let tier = classify(request);
        let tier_name = self.tiers.name(tier).to_string();

        match strategy_for(tier) {
            FetchStrategy::CacheFirst => Ok(self.cache_first(request, &tier_name).await),
            FetchStrategy::NetworkFirst => self.network_first(request, &tier_name).await,
        }
    }

    async fn cache_first(&self, request: &Request, tier_name: &str) -> Response {
        let identity = request.identity();

        if let Some(hit) = self.store.get(tier_name, &identity) {
            debug!(identity, tier = tier_name, "cache-first hit");
            return hit;
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_copy(tier_name, &identity, &response);
                }
                response
            }
            Err(e) => {
                warn!(identity, error = %e, "cache-first fetch failed with nothing cached");
                // Navigation requests degrade to the cached shell root so
                // the app still opens offline.
                if request.kind == ResourceKind::Document {
                    if let Some(root) = self
                        .store
                        .get(self.tiers.name(CacheTier::AppShell), "GET /")
                    {
                        return root;
                    }
                }
                Response::unavailable()
            }
        }
    }

    async fn network_first(
        &self,
        request: &Request,
        tier_name: &str,
    ) -> Result<Response, CacheError> {
        let identity = request.identity();

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_copy(tier_name, &identity, &response);
                }
                Ok(response)
            }
            Err(e) => match self.store.get(tier_name, &identity) {
                Some(cached) => {
                    debug!(identity, tier = tier_name, "network failed, serving cached");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }

    /// Fire-and-forget tier write; the caller's response is never held up
    /// by storage.
    fn store_copy(&self, tier_name: &str, identity: &str, response: &Response) {
        let store = Arc::clone(&self.store);
        let tier_name = tier_name.to_string();
        let identity = identity.to_string();
        let copy = response.clone();
        tokio::spawn(async move {
            store.put(&tier_name, &identity, copy);
        });
    }

    /// Install: bulk-populate the app shell from the manifest.
    ///
    /// All-or-nothing: every resource is fetched before anything is stored,
    /// and any single failure aborts with [`CacheError::Install`].
    pub async fn install(&self) -> Result<(), CacheError> {
        let mut fetched = Vec::with_capacity(self.manifest.len());

        for url in &self.manifest {
            let request = Request::get_inferred(url.clone());
            let response = match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    return Err(CacheError::Install {
                        url: url.clone(),
                        reason: format!("HTTP {}", response.status),
                    })
                }
                Err(e) => {
                    return Err(CacheError::Install {
                        url: url.clone(),
                        reason: e.to_string(),
                    })
                }
            };
            fetched.push((request.identity(), response));
        }

        let shell = self.tiers.name(CacheTier::AppShell);
        for (identity, response) in fetched {
            self.store.put(shell, &identity, response);
        }
        info!(
            resources = self.manifest.len(),
            tier = shell,
            "app shell installed"
        );
        Ok(())
    }

    /// Activate: delete every stored tier whose versioned name is no longer
    /// current. Takes effect immediately; there is no deferred claim step.
    /// Returns the names of the tiers removed.
    pub fn activate(&self) -> Vec<String> {
        let current = self.tiers.all();
        let mut removed = Vec::new();
        for name in self.store.tier_names() {
            if !current.contains(&name.as_str()) {
                self.store.delete_tier(&name);
                removed.push(name);
            }
        }
        if !removed.is_empty() {
            info!(?removed, "stale cache tiers deleted");
        }
        removed
    }

    /// Handle a side-channel message.
    ///
    /// `CACHE_URLS` warms the app shell with extra resources, best-effort:
    /// individual fetch failures are logged and skipped. Returns the number
    /// of URLs actually cached.
    pub async fn handle_message(&self, message: Message) -> usize {
        match message {
            Message::CacheUrls { urls } => {
                let shell = self.tiers.name(CacheTier::AppShell).to_string();
                let mut cached = 0;
                for url in urls {
                    let request = Request::get_inferred(url.clone());
                    match self.fetcher.fetch(&request).await {
                        Ok(response) if response.is_success() => {
                            self.store.put(&shell, &request.identity(), response);
                            cached += 1;
                        }
                        Ok(response) => {
                            warn!(url, status = response.status, "skipping uncacheable URL");
                        }
                        Err(e) => {
                            warn!(url, error = %e, "skipping unfetchable URL");
                        }
                    }
                }
                debug!(cached, "processed CACHE_URLS message");
                cached
            }
        }
    }
}
