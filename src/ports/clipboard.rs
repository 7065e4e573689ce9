//! Clipboard port for handing a resolved link to the user.

use thiserror::Error;

/// Why a clipboard write did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard mechanism is available in this environment.
    #[error("no clipboard available")]
    Unavailable,
    /// A clipboard mechanism exists but rejected the write.
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Writes plain text to the platform clipboard.
pub trait Clipboard: Send + Sync {
    /// Places `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if no clipboard accepted the text.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
