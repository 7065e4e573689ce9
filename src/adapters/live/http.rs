//! Live adapter for the `HttpFetcher` port using `reqwest`.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;

use crate::ports::http::{FetchFuture, FetchRequest, FetchResponse, HttpError, HttpFetcher};

/// Live HTTP fetcher backed by a shared `reqwest` client.
///
/// The client keeps no cookie store, so requests carry no credentials
/// beyond what the URL itself names.
pub struct LiveHttpFetcher {
    client: Client,
}

impl LiveHttpFetcher {
    /// Creates a new live fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for LiveHttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn transport(err: &reqwest::Error) -> HttpError {
    HttpError::Transport(err.to_string())
}

impl HttpFetcher for LiveHttpFetcher {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let mut builder = self.client.get(&request.url);
            if request.bypass_cache {
                builder =
                    builder.header(CACHE_CONTROL, "no-cache, no-store").header(PRAGMA, "no-cache");
            }

            let mut response = builder.send().await.map_err(|e| transport(&e))?;
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if !request.read_body {
                return Ok(FetchResponse { status, content_length, body: String::new() });
            }

            if let (Some(limit), Some(declared)) = (request.max_body_bytes, content_length) {
                if declared > limit {
                    return Err(HttpError::TooLarge { limit });
                }
            }

            // Content-Length may be absent or wrong, so the limit is enforced
            // while streaming as well.
            let mut body = Vec::new();
            while let Some(chunk) = response.chunk().await.map_err(|e| transport(&e))? {
                body.extend_from_slice(&chunk);
                if let Some(limit) = request.max_body_bytes {
                    if u64::try_from(body.len()).unwrap_or(u64::MAX) > limit {
                        return Err(HttpError::TooLarge { limit });
                    }
                }
            }

            Ok(FetchResponse {
                status,
                content_length,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        })
    }
}
