//! Hands the resolved link to the user.

use std::io::{self, Write};

use crate::ports::clipboard::Clipboard;
use crate::ports::logger::Logger;

const COMPONENT: &str = "handoff";

/// What happened to the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The link is on the clipboard.
    Copied,
    /// The clipboard refused it; the user was shown the link to copy by hand.
    Manual {
        /// Why the clipboard write failed.
        reason: String,
    },
}

/// Copies `url` to the clipboard and writes a short confirmation to `out`.
///
/// When the clipboard is unavailable the link is printed in a manual-copy
/// block instead. Clipboard failures are not errors.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub fn deliver(
    clipboard: &dyn Clipboard,
    logger: &dyn Logger,
    url: &str,
    out: &mut dyn Write,
) -> io::Result<Delivery> {
    match clipboard.write_text(url) {
        Ok(()) => {
            writeln!(out, "Link copied to clipboard: {url}")?;
            Ok(Delivery::Copied)
        }
        Err(err) => {
            logger.info(COMPONENT, &format!("falling back to manual copy: {err}"));
            writeln!(out, "Copy this link:")?;
            writeln!(out, "  {url}")?;
            Ok(Delivery::Manual { reason: err.to_string() })
        }
    }
}
