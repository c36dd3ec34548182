//! Interceptor adapter for the routing stack.
//!
//! Implements the routing [`HttpClient`] port on top of
//! [`CacheManager::handle`], so the geocoder's and routing client's own
//! network calls flow through the same tier strategies as everything else.
//! With this in place a previously routed query keeps working offline even
//! before the routing client's own memoization has seen it.

use std::sync::Arc;

use futures::future::BoxFuture;

use super::manager::CacheManager;
use super::types::{CacheError, Request, ResourceKind, Response};
use crate::routing::http::{HttpClient, HttpError, HttpResponse};

/// Routes the routing stack's HTTP traffic through the cache interceptor.
pub struct CachingHttpClient {
    manager: Arc<CacheManager>,
}

impl CachingHttpClient {
    pub fn new(manager: Arc<CacheManager>) -> Self {
        Self { manager }
    }

    fn convert(url: &str, result: Result<Response, CacheError>) -> Result<HttpResponse, HttpError> {
        match result {
            Ok(response) if response.is_success() => Ok(HttpResponse {
                status: response.status,
                body: response.body,
            }),
            Ok(response) => Err(HttpError::Status {
                status: response.status,
                url: url.to_string(),
            }),
            Err(e) => Err(HttpError::Transport(e.to_string())),
        }
    }
}

impl HttpClient for CachingHttpClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        let request = Request::get(url, ResourceKind::Data);
        let url = url.to_string();
        Box::pin(async move {
            let result = self.manager.handle(&request).await;
            Self::convert(&url, result)
        })
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: serde_json::Value,
    ) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        let request = Request::post(
            url,
            ResourceKind::Data,
            headers.to_vec(),
            body.to_string().into_bytes(),
        );
        let url = url.to_string();
        Box::pin(async move {
            let result = self.manager.handle(&request).await;
            Self::convert(&url, result)
        })
    }
}
