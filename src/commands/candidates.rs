//! `cshlink candidates` command.

use url::Url;

use crate::locate::discovery_candidates;
use crate::paths::{decode_path, strip_transient};

/// Path portion of a URL, or the argument itself when it is not a URL.
fn page_path(target: &str) -> String {
    match Url::parse(target) {
        Ok(url) => decode_path(url.path()).into_owned(),
        Err(_) => decode_path(strip_transient(target)).into_owned(),
    }
}

/// Renders the candidate table printed by [`run`].
#[must_use]
pub fn render(target: &str, max_depth: usize) -> String {
    let candidates = discovery_candidates(&page_path(target), max_depth);
    let width = candidates.iter().map(|c| c.base.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        out.push_str(&format!("{:>2}. {:<width$}  {}\n", i + 1, candidate.base, candidate.kind));
    }
    out
}

/// Execute the `candidates` command.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn run(target: &str, max_depth: usize) -> Result<(), String> {
    print!("{}", render(target, max_depth));
    Ok(())
}
