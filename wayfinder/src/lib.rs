//! Wayfinder - offline-capable turn-by-turn navigation engine
//!
//! This library provides the core of an offline-first map navigation client:
//! geocoding and routing with persistent memoization and synthetic fallbacks,
//! synthesis of turn-by-turn instructions from route geometry, a progress
//! tracker that follows a live position stream, voice announcements, and a
//! tiered request-interception cache that keeps the application usable
//! without connectivity.
//!
//! Presentation concerns (map rendering, page layout) are out of scope; the
//! engine exposes route geometry, the current instruction, and distances for
//! external collaborators to render.

pub mod announce;
pub mod cache;
pub mod geo;
pub mod nav;
pub mod routing;
pub mod storage;
