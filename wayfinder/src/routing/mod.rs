//! Geocoding and route computation
//!
//! This module resolves free-text place queries to coordinates and fetches
//! driving-route geometry, with persistent memoization and offline
//! fallbacks at every layer. Transport failures never surface from routing;
//! only an unresolvable place name ([`GeocodeError::NotFound`]) is allowed
//! to reach the caller.

mod client;
mod geocoder;
pub mod http;
mod planner;
mod types;

pub use client::{RoutingClient, DEFAULT_OPENROUTE_BASE};
pub use geocoder::{Geocoder, DEFAULT_NOMINATIM_BASE};
pub use http::{HttpClient, HttpError, HttpResponse, ReqwestClient};
pub use planner::{CurrentRouteRecord, RoutePlanner};
pub use types::{GeocodeError, RouteGeometry, RoutingError, AVERAGE_SPEED_MPS};
