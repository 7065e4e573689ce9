//! Recording adapter for the `HttpFetcher` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_interaction;
use crate::cassette::format::HttpOutcome;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::http::{FetchFuture, FetchRequest, HttpFetcher};

/// Records HTTP interactions while delegating to an inner implementation.
pub struct RecordingHttpFetcher {
    inner: Box<dyn HttpFetcher>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpFetcher {
    /// Creates a new recording fetcher wrapping the given implementation.
    pub fn new(inner: Box<dyn HttpFetcher>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Recorded request identity; replay checks it against the live request.
#[derive(Serialize)]
pub(crate) struct UrlInput<'a> {
    pub(crate) url: &'a str,
}

/// Records `Cancelled` if dropped before the request settles.
struct PendingRecord<'a> {
    recorder: &'a Arc<Mutex<CassetteRecorder>>,
    url: String,
    settled: bool,
}

impl PendingRecord<'_> {
    fn settle(&mut self, outcome: &HttpOutcome) {
        self.settled = true;
        record_interaction(self.recorder, "http", "get", &UrlInput { url: &self.url }, outcome);
    }
}

impl Drop for PendingRecord<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(&HttpOutcome::Cancelled);
        }
    }
}

impl HttpFetcher for RecordingHttpFetcher {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let pending = self.inner.get(request);
        let mut record =
            PendingRecord { recorder: &self.recorder, url: request.url.clone(), settled: false };

        Box::pin(async move {
            let result = pending.await;
            let outcome = match &result {
                Ok(response) => HttpOutcome::Ok(response.clone()),
                Err(err) => HttpOutcome::Err(err.clone()),
            };
            record.settle(&outcome);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticFetcher;
    use crate::ports::http::get_with_timeout;
    use std::time::Duration;

    fn recorder() -> Arc<Mutex<CassetteRecorder>> {
        let path = std::env::temp_dir().join("cshlink_rec_http_test.cassette.yaml");
        Arc::new(Mutex::new(CassetteRecorder::new(path, "test")))
    }

    #[tokio::test]
    async fn records_completed_requests() {
        let recorder = recorder();
        let inner = StaticFetcher::new().with_page("https://h/Data/Alias.xml", "<x/>");
        let fetcher = RecordingHttpFetcher::new(Box::new(inner), Arc::clone(&recorder));

        let response =
            fetcher.get(&FetchRequest::probe("https://h/Data/Alias.xml")).await.unwrap();
        assert_eq!(response.status, 200);
        let _ = fetcher.get(&FetchRequest::probe("https://h/missing")).await;

        assert_eq!(recorder.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn records_cancellation_on_timeout() {
        let recorder = recorder();
        let inner = StaticFetcher::new().with_stall("https://h/slow");
        let fetcher = RecordingHttpFetcher::new(Box::new(inner), Arc::clone(&recorder));

        let result = get_with_timeout(
            &fetcher,
            &FetchRequest::probe("https://h/slow"),
            Duration::from_millis(10),
        )
        .await;
        assert!(result.is_err());

        let guard = recorder.lock().unwrap();
        assert_eq!(guard.len(), 1);
    }
}
