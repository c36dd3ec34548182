//! Request/response model for the cache interceptor.
//!
//! The interceptor sees outbound traffic as plain [`Request`] values and
//! answers with [`Response`] values, whether they came from the network or
//! a cache tier. Entries are identified by `"METHOD url"`; request bodies
//! deliberately do not contribute to identity (coarse by design, matching
//! how offline replay of routing calls is expected to behave).

use futures::future::BoxFuture;
use thiserror::Error;

/// HTTP method, restricted to what the interceptor handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Coarse resource classification used for tier routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Script,
    Style,
    Image,
    Data,
    Other,
}

impl ResourceKind {
    /// Infer a resource kind from a URL, for requests arriving without an
    /// explicit kind (manifest entries, side-channel URL lists).
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.ends_with(".js") || path.ends_with(".mjs") {
            ResourceKind::Script
        } else if path.ends_with(".css") {
            ResourceKind::Style
        } else if path.ends_with(".png")
            || path.ends_with(".jpg")
            || path.ends_with(".jpeg")
            || path.ends_with(".webp")
            || path.ends_with(".svg")
        {
            ResourceKind::Image
        } else if path.ends_with(".json") {
            ResourceKind::Data
        } else if path.ends_with('/') || path.ends_with(".html") {
            ResourceKind::Document
        } else {
            ResourceKind::Other
        }
    }
}

/// An outbound network request seen by the interceptor.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub kind: ResourceKind,
    /// Extra headers forwarded to the network.
    pub headers: Vec<(String, String)>,
    /// Request body for POST.
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// A GET request with an explicit resource kind.
    pub fn get(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            kind,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A GET request with the kind inferred from the URL.
    pub fn get_inferred(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = ResourceKind::from_url(&url);
        Self::get(url, kind)
    }

    /// A POST request carrying a body.
    pub fn post(
        url: impl Into<String>,
        kind: ResourceKind,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            kind,
            headers,
            body: Some(body),
        }
    }

    /// Normalized cache identity: method and URL.
    pub fn identity(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }
}

/// A response delivered to the interceptor's caller.
///
/// May have come from the live network or from a cache tier; callers cannot
/// tell the difference and should not need to.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl Response {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Synthesized response for an uncached resource while offline.
    pub fn unavailable() -> Self {
        Self {
            status: 503,
            body: b"offline and not cached".to_vec(),
            content_type: Some("text/plain".to_string()),
        }
    }
}

/// Errors surfaced by the cache interceptor.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Network failure with no cached copy to fall back on.
    #[error("transport failure: {0}")]
    Transport(String),

    /// App-shell population aborted; install must be retried.
    #[error("install failed fetching {url}: {reason}")]
    Install { url: String, reason: String },
}

/// Network port for the interceptor.
///
/// Returns `Ok` for any completed HTTP exchange, including non-2xx
/// statuses; `Err` only for transport-level failures. There is no
/// cancellation: an in-flight fetch runs to completion and its result is
/// simply discarded if no longer wanted.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: &Request) -> BoxFuture<'_, Result<Response, CacheError>>;
}

/// Real fetcher backed by reqwest.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, CacheError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CacheError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(&self, request: &Request) -> BoxFuture<'_, Result<Response, CacheError>> {
        let request = request.clone();
        Box::pin(async move {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| CacheError::Transport(format!("request failed: {e}")))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let body = response
                .bytes()
                .await
                .map_err(|e| CacheError::Transport(format!("failed to read response: {e}")))?
                .to_vec();

            Ok(Response {
                status,
                body,
                content_type,
            })
        })
    }
}
