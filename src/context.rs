//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::clipboard::LiveClipboard;
use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::http::LiveHttpFetcher;
use crate::adapters::live::logger::TracingLogger;
use crate::adapters::memory::MemoryClipboard;
use crate::adapters::recording::{RecordingClock, RecordingHttpFetcher};
use crate::adapters::replaying::{ReplayingClock, ReplayingHttpFetcher};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clipboard::{Clipboard, ClipboardError};
use crate::ports::clock::Clock;
use crate::ports::http::HttpFetcher;
use crate::ports::logger::Logger;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock used to age the manifest cache.
    pub clock: Box<dyn Clock>,
    /// HTTP client for probes and manifest fetches.
    pub http: Box<dyn HttpFetcher>,
    /// Clipboard receiving the final link.
    pub clipboard: Box<dyn Clipboard>,
    /// Sink for diagnostics.
    pub logger: Box<dyn Logger>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters, without recording.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        http: Box<dyn HttpFetcher>,
        clipboard: Box<dyn Clipboard>,
        logger: Box<dyn Logger>,
    ) -> Self {
        Self { clock, http, clipboard, logger, recorder: None }
    }

    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live() -> Self {
        Self::new(
            Box::new(LiveClock),
            Box::new(LiveHttpFetcher::new()),
            Box::new(LiveClipboard),
            Box::new(TracingLogger),
        )
    }

    /// Creates a recording context that writes a cassette file on drop.
    ///
    /// Clock and HTTP traffic go through live adapters and are captured.
    /// This is the developer-only mechanism behind `CSHLINK_RECORD`.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "cshlink-session")));
        Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            http: Box::new(RecordingHttpFetcher::new(
                Box::new(LiveHttpFetcher::new()),
                Arc::clone(&recorder),
            )),
            clipboard: Box::new(LiveClipboard),
            logger: Box::new(TracingLogger),
            recorder: Some(recorder),
        }
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// The clipboard is always unavailable during replay so the printed
    /// output does not depend on the machine running it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        // Each port gets its own replayer so per-port cursors are independent.
        Ok(Self::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingHttpFetcher::new(CassetteReplayer::new(&cassette))),
            Box::new(MemoryClipboard::failing(ClipboardError::Unavailable)),
            Box::new(TracingLogger),
        ))
    }

    /// Tags the cassette being recorded (if any) with the page it resolved.
    pub fn note_page_url(&self, page_url: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.lock().unwrap_or_else(PoisonError::into_inner).set_page_url(page_url);
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let written = recorder.lock().unwrap_or_else(PoisonError::into_inner).write();
            if let Err(e) = written {
                self.logger.warn("cassette", &format!("failed to write cassette: {e}"));
            }
        }
    }
}
