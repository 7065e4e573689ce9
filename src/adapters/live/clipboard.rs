//! Live clipboard adapter that pipes text into the platform's copy command.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use crate::ports::clipboard::{Clipboard, ClipboardError};

/// Copy commands tried in order; the first one that exists is used.
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Live clipboard that shells out to `pbcopy`, `wl-copy`, `xclip`, `xsel`,
/// or `clip.exe`.
pub struct LiveClipboard;

fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    // Stdin is dropped before waiting so the command sees EOF; the child is
    // reaped even when the write fails.
    let written = child.stdin.take().map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));
    let status = child.wait()?;
    written?;
    Ok(status.success())
}

impl Clipboard for LiveClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_failure = None;
        for (program, args) in COPY_COMMANDS {
            match pipe_into(program, args, text) {
                Ok(true) => return Ok(()),
                Ok(false) => last_failure = Some(format!("{program} exited with an error")),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => last_failure = Some(format!("{program}: {e}")),
            }
        }
        Err(last_failure.map_or(ClipboardError::Unavailable, ClipboardError::WriteFailed))
    }
}
