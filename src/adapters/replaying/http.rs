//! Replaying adapter for the `HttpFetcher` port.

use std::sync::{Mutex, PoisonError};

use crate::adapters::recording::http::UrlInput;
use crate::cassette::format::HttpOutcome;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::http::{FetchFuture, FetchRequest, HttpError, HttpFetcher};

/// Serves recorded HTTP responses from a cassette.
///
/// Requests must arrive in the recorded order with the recorded URLs.
/// A recorded cancellation replays as a request that never completes, so
/// the caller's timeout fires again.
pub struct ReplayingHttpFetcher {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHttpFetcher {
    /// Creates a new replaying fetcher from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl HttpFetcher for ReplayingHttpFetcher {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let input = serde_json::to_value(UrlInput { url: &request.url }).unwrap_or_default();
        let output = {
            let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
            replayer.next_matching("http", "get", &input).output.clone()
        };
        let outcome = serde_json::from_value::<HttpOutcome>(output)
            .map_err(|e| HttpError::Transport(format!("http::get: unreadable cassette entry: {e}")));
        let read_body = request.read_body;

        Box::pin(async move {
            match outcome? {
                HttpOutcome::Ok(mut response) => {
                    if !read_body {
                        response.body.clear();
                    }
                    Ok(response)
                }
                HttpOutcome::Err(err) => Err(err),
                HttpOutcome::Cancelled => std::future::pending().await,
            }
        })
    }
}
