//! Offline request interception cache
//!
//! Intercepts every outbound network request the application makes and
//! serves cached responses when the network cannot. Requests are classified
//! into versioned tiers, each handled by a fixed strategy: the app shell is
//! cache-first, everything else network-first with cached fallback.
//!
//! The interceptor runs decoupled from the navigation engine; the two share
//! no mutable state and communicate only through the network boundary and
//! the [`Message`] side channel.

mod adapter;
mod manager;
mod store;
mod tier;
mod types;

pub use adapter::CachingHttpClient;
pub use manager::{CacheManager, Message, DEFAULT_APP_SHELL_MANIFEST};
pub use store::TierStore;
pub use tier::{classify, strategy_for, CacheTier, FetchStrategy, TierSet};
pub use types::{CacheError, Fetcher, Method, Request, ReqwestFetcher, ResourceKind, Response};
