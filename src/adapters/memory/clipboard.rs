//! Clipboard held in memory.

use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::clipboard::{Clipboard, ClipboardError};

#[derive(Default)]
struct State {
    contents: Option<String>,
    failure: Option<ClipboardError>,
}

/// Stores the last written text, or fails on demand.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<State>>,
}

impl MemoryClipboard {
    /// Creates a working, empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard whose writes always fail with `error`.
    #[must_use]
    pub fn failing(error: ClipboardError) -> Self {
        let clipboard = Self::default();
        clipboard.state.lock().unwrap_or_else(PoisonError::into_inner).failure = Some(error);
        clipboard
    }

    /// The last successfully written text.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).contents.clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        state.contents = Some(text.to_string());
        Ok(())
    }
}
