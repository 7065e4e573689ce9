//! Pure helpers for splitting, joining and trimming site paths and URLs.
//!
//! None of these touch the network or fail; odd input (empty strings,
//! doubled slashes) is tolerated rather than rejected.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside one path segment. `%` is included so decoded
/// text round-trips, and `#`/`?` so a folder name cannot start a fragment or
/// query.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Splits a path into its non-empty `/`-separated segments.
#[must_use]
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Joins segments into an absolute path. No segments yields `/`.
#[must_use]
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::with_capacity(segments.iter().map(|s| s.as_ref().len() + 1).sum());
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Returns `true` when the segment ends in a dot followed by one or more
/// ASCII alphanumerics (`page.htm`, `index.HTML5`).
#[must_use]
pub fn has_extension(segment: &str) -> bool {
    extension_of(segment).is_some()
}

/// The raw suffix after the last dot, if [`has_extension`] holds.
#[must_use]
pub fn extension_of(segment: &str) -> Option<&str> {
    let (_, suffix) = segment.rsplit_once('.')?;
    (!suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric())).then_some(suffix)
}

/// Drops everything from the first `?` or `#`.
#[must_use]
pub fn strip_transient(url: &str) -> &str {
    url.find(['?', '#']).map_or(url, |cut| &url[..cut])
}

/// Concatenates a base directory and a tail with exactly one slash between
/// them. A root base (`/` or empty) yields the tail as an absolute path.
#[must_use]
pub fn join_base(base: &str, tail: &str) -> String {
    let tail = tail.trim_start_matches('/');
    let base = base.trim_end_matches('/');
    format!("{base}/{tail}")
}

/// Normalizes a base path: leading slash, no trailing slash unless it is `/`.
#[must_use]
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// The directory holding `path`: the last segment is dropped only when it
/// looks like a file (see [`has_extension`]).
#[must_use]
pub fn directory_of(path: &str) -> String {
    let mut segments = split_segments(path);
    if segments.last().is_some_and(|last| has_extension(last)) {
        segments.pop();
    }
    join_segments(&segments)
}

/// Percent-decodes a URL path, replacing invalid UTF-8 sequences.
#[must_use]
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

/// Percent-encodes each segment of a decoded absolute path, the inverse of
/// [`decode_path`] for request building.
#[must_use]
pub fn encode_path(path: &str) -> String {
    let segments: Vec<String> = split_segments(path)
        .into_iter()
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect();
    join_segments(&segments)
}
