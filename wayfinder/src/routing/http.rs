//! HTTP client abstraction for testability
//!
//! The geocoder and routing client talk to the network through this port so
//! tests can inject canned responses, and so the cache interceptor can slot
//! itself underneath the whole routing stack (see
//! [`crate::cache::CachingHttpClient`]).

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors produced by HTTP transport.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// The request never completed (connection failure, timeout, DNS, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// A fetched HTTP response body with its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Trait for HTTP client operations.
///
/// Uses boxed futures so implementations can be held as `Arc<dyn HttpClient>`
/// across async tasks.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>>;

    /// Performs an HTTP POST with a JSON body and optional extra headers.
    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: serde_json::Value,
    ) -> BoxFuture<'_, Result<HttpResponse, HttpError>>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default 30 second timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(30)
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(HttpError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Transport(format!("failed to read response: {e}")))?
            .to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| HttpError::Transport(format!("request failed: {e}")))?;
            Self::read(&url, response).await
        })
    }

    fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: serde_json::Value,
    ) -> BoxFuture<'_, Result<HttpResponse, HttpError>> {
        let url = url.to_string();
        let headers = headers.to_vec();
        Box::pin(async move {
            let mut request = self.client.post(&url).json(&body);
            for (name, value) in &headers {
                request = request.header(name, value);
            }
            let response = request
                .send()
                .await
                .map_err(|e| HttpError::Transport(format!("request failed: {e}")))?;
            Self::read(&url, response).await
        })
    }
}
