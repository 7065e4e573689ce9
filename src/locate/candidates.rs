//! Candidate base paths for manifest discovery.
//!
//! Generated output can be deployed at any depth, so the base directory is
//! guessed from the page path. Candidates are ordered most specific first:
//!
//! ```text
//! /Docs/2024/TopNav/Content/x/y.htm
//!   versioned docs  /Docs/2024/TopNav
//!   content root    /Docs/2024/TopNav            (deduplicated)
//!   ancestors       /Docs/2024/TopNav/Content/x, /Docs/2024/TopNav/Content, ...
//!   root            /
//! ```

use std::fmt;

use crate::paths::{directory_of, has_extension, join_segments, split_segments};

/// Top-level folders that commonly hold versioned documentation.
const DOCS_FOLDERS: &[&str] = &["docs", "documentation", "help", "manuals"];

/// Output folders that sit directly under a version segment.
const NAV_FOLDERS: &[&str] = &["topnav", "sidenav", "tripane", "responsive", "webhelp", "html5"];

/// Folder that holds topic files inside an output.
const CONTENT_FOLDER: &str = "content";

/// Which rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// `<docs>/<version>/<nav>` prefix.
    VersionedDocs,
    /// Prefix before the last `Content` folder.
    ContentRoot,
    /// A directory above the page.
    Ancestor,
    /// The site root.
    Root,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VersionedDocs => "versioned-docs",
            Self::ContentRoot => "content-root",
            Self::Ancestor => "ancestor",
            Self::Root => "root",
        };
        f.write_str(name)
    }
}

/// A base path worth probing for a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCandidate {
    /// Absolute base path without a trailing slash (except `/`).
    pub base: String,
    /// Rule that produced it.
    pub kind: CandidateKind,
}

fn is_version_like(segment: &str) -> bool {
    if segment.eq_ignore_ascii_case("latest") || segment.eq_ignore_ascii_case("current") {
        return true;
    }
    let digits = segment.strip_prefix(['v', 'V']).unwrap_or(segment);
    !digits.is_empty()
        && digits.split(['.', '_', '-']).all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
        })
}

fn is_one_of(segment: &str, names: &[&str]) -> bool {
    names.iter().any(|name| segment.eq_ignore_ascii_case(name))
}

/// Deepest `<docs>/<version>/<nav>` run in the path, as a prefix through the
/// navigation folder.
#[must_use]
pub fn versioned_docs_base(path: &str) -> Option<String> {
    let segments = split_segments(path);
    (0..segments.len().saturating_sub(2)).rev().find_map(|i| {
        let matched = is_one_of(segments[i], DOCS_FOLDERS)
            && is_version_like(segments[i + 1])
            && is_one_of(segments[i + 2], NAV_FOLDERS);
        matched.then(|| join_segments(&segments[..=i + 2]))
    })
}

/// Prefix before the last `Content` folder, unless that prefix is the root.
#[must_use]
pub fn content_root_base(path: &str) -> Option<String> {
    let segments = split_segments(path);
    let last = segments.iter().rposition(|s| s.eq_ignore_ascii_case(CONTENT_FOLDER))?;
    (last > 0).then(|| join_segments(&segments[..last]))
}

/// Base assumed when no probe answers: the prefix before the last `Content`
/// folder (the root when `Content` is the first segment), otherwise the
/// page's directory.
#[must_use]
pub fn heuristic_base(path: &str) -> String {
    let segments = split_segments(path);
    match segments.iter().rposition(|s| s.eq_ignore_ascii_case(CONTENT_FOLDER)) {
        Some(last) => join_segments(&segments[..last]),
        None => directory_of(path),
    }
}

/// Directories above the page, deepest first, at most `max_depth` of them.
///
/// The final segment only counts as a file name when it has an extension.
#[must_use]
pub fn ancestor_bases(path: &str, max_depth: usize) -> Vec<String> {
    let mut segments = split_segments(path);
    if segments.last().is_some_and(|last| has_extension(last)) {
        segments.pop();
    }
    (1..=segments.len()).rev().take(max_depth).map(|len| join_segments(&segments[..len])).collect()
}

/// All discovery candidates for `path`, de-duplicated, root last.
#[must_use]
pub fn discovery_candidates(path: &str, max_depth: usize) -> Vec<BaseCandidate> {
    let heuristics = [
        (versioned_docs_base(path), CandidateKind::VersionedDocs),
        (content_root_base(path), CandidateKind::ContentRoot),
    ];
    let ordered = heuristics
        .into_iter()
        .filter_map(|(base, kind)| base.map(|base| (base, kind)))
        .chain(ancestor_bases(path, max_depth).into_iter().map(|b| (b, CandidateKind::Ancestor)))
        .chain(std::iter::once(("/".to_string(), CandidateKind::Root)));

    let mut candidates: Vec<BaseCandidate> = Vec::new();
    for (base, kind) in ordered {
        if !candidates.iter().any(|c| c.base == base) {
            candidates.push(BaseCandidate { base, kind });
        }
    }
    candidates
}
