//! HTTP port for same-origin GET requests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future type alias used by [`HttpFetcher`] to keep the trait dyn-compatible.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchResponse, HttpError>> + Send + 'a>>;

/// A GET request against the documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Absolute URL to fetch.
    pub url: String,
    /// Ask intermediaries not to serve or keep a cached copy.
    pub bypass_cache: bool,
    /// Whether the body is needed at all; probes only look at the status.
    pub read_body: bool,
    /// Abort with [`HttpError::TooLarge`] once the body exceeds this many bytes.
    pub max_body_bytes: Option<u64>,
}

impl FetchRequest {
    /// A cache-bypassing request that only inspects the status code.
    #[must_use]
    pub fn probe(url: impl Into<String>) -> Self {
        Self { url: url.into(), bypass_cache: true, read_body: false, max_body_bytes: None }
    }

    /// A cache-bypassing request that reads at most `max_body_bytes`.
    #[must_use]
    pub fn document(url: impl Into<String>, max_body_bytes: u64) -> Self {
        Self {
            url: url.into(),
            bypass_cache: true,
            read_body: true,
            max_body_bytes: Some(max_body_bytes),
        }
    }
}

/// The response to a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Declared `Content-Length`, if any.
    pub content_length: Option<u64>,
    /// Response body; empty when the request did not ask for it.
    pub body: String,
}

impl FetchResponse {
    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP status level.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HttpError {
    /// Connection, TLS, or protocol failure.
    #[error("request failed: {0}")]
    Transport(String),
    /// The attempt was abandoned when its timer expired.
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
    /// The body exceeded the request's size limit.
    #[error("response body exceeds {limit} bytes")]
    TooLarge {
        /// The limit that was exceeded.
        limit: u64,
    },
}

/// Issues HTTP requests on behalf of the resolver.
///
/// Abstracting HTTP allows deterministic replay and in-memory sites in tests.
pub trait HttpFetcher: Send + Sync {
    /// Performs a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or an oversized body; a
    /// non-2xx status is a successful response.
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_>;
}

/// Runs `fetch` on `fetcher`, abandoning it once `timeout` elapses.
///
/// Dropping the pending future on expiry cancels the in-flight request.
///
/// # Errors
///
/// Returns [`HttpError::TimedOut`] on expiry, otherwise the fetcher's result.
pub async fn get_with_timeout(
    fetcher: &dyn HttpFetcher,
    request: &FetchRequest,
    timeout: Duration,
) -> Result<FetchResponse, HttpError> {
    tokio::time::timeout(timeout, fetcher.get(request))
        .await
        .unwrap_or(Err(HttpError::TimedOut(timeout)))
}
