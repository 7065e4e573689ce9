//! Parsing the alias manifest into a three-way lookup.
//!
//! The manifest is an XML document of `Map` records:
//!
//! ```xml
//! <CatapultAliasFile>
//!   <Map Name="Install" Link="Content/Setup/Install.htm" ResolvedId="1000" />
//! </CatapultAliasFile>
//! ```
//!
//! Each record is reachable by its full link, by the link without a leading
//! `content/` folder, and by its bare file name. The file-name key ignores
//! directories, so two `index.htm` topics in different folders share it and
//! the later record wins there. Lookups try the keys in that order, so the
//! lenient file-name match is only used when nothing more precise exists.

use std::collections::HashMap;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ManifestError;

/// Extensions a `Default.<ext>` entry page may use.
pub const ALLOWED_EXTENSIONS: &[&str] = &["htm", "html", "php"];

const CONTENT_PREFIX: &str = "content/";

/// One alias record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Normalized (lowercase, relative) link.
    pub link: String,
    /// Opaque CSHID.
    pub resolved_id: String,
    /// Entry-page extension for this output.
    pub extension: String,
}

/// Which key space produced a match, most precise first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    /// Full normalized link.
    Full,
    /// Link without its leading `content/` folder.
    ContentStripped,
    /// Bare file name only.
    FileName,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::ContentStripped => "content-stripped",
            Self::FileName => "file-name",
        })
    }
}

/// Normalizes a link or target path for comparison: lowercase, forward
/// slashes, no leading `/` or `./`.
#[must_use]
pub fn normalize_link(link: &str) -> String {
    let lowered = link.trim().replace('\\', "/").to_lowercase();
    let mut rest = lowered.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    rest.to_string()
}

fn strip_content(link: &str) -> &str {
    link.strip_prefix(CONTENT_PREFIX).unwrap_or(link)
}

fn file_name(link: &str) -> &str {
    link.rsplit_once('/').map_or(link, |(_, name)| name)
}

/// Entry-page extension for a link: its suffix, lowercased and reduced to
/// alphanumerics, or `default` when that is not an allowed extension.
#[must_use]
pub fn entry_extension(link: &str, default: &str) -> String {
    let suffix = file_name(link).rsplit_once('.').map_or("", |(_, suffix)| suffix);
    let cleaned: String = suffix
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&cleaned.as_str()) {
        cleaned
    } else {
        default.to_string()
    }
}

/// Parsed alias manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestIndex {
    entries: Vec<ManifestEntry>,
    full: HashMap<String, usize>,
    content_stripped: HashMap<String, usize>,
    file_name: HashMap<String, usize>,
}

impl ManifestIndex {
    /// Registers a record under all three keys. Later records overwrite
    /// earlier ones on identical keys.
    pub fn insert(&mut self, link: &str, resolved_id: &str, default_extension: &str) {
        let link = normalize_link(link);
        if link.is_empty() {
            return;
        }
        let slot = self.entries.len();
        self.entries.push(ManifestEntry {
            extension: entry_extension(&link, default_extension),
            resolved_id: resolved_id.to_string(),
            link: link.clone(),
        });

        let name = file_name(&link);
        if !name.is_empty() {
            self.file_name.insert(name.to_string(), slot);
        }
        self.content_stripped.insert(strip_content(&link).to_string(), slot);
        self.full.insert(link, slot);
    }

    /// Looks up a target path, trying full, content-stripped, then file-name keys.
    #[must_use]
    pub fn lookup(&self, target: &str) -> Option<(MatchKind, &ManifestEntry)> {
        let target = normalize_link(target);
        let name = file_name(&target);
        self.full
            .get(&target)
            .map(|&slot| (MatchKind::Full, slot))
            .or_else(|| {
                self.content_stripped
                    .get(strip_content(&target))
                    .map(|&slot| (MatchKind::ContentStripped, slot))
            })
            .or_else(|| {
                (!name.is_empty())
                    .then(|| self.file_name.get(name))
                    .flatten()
                    .map(|&slot| (MatchKind::FileName, slot))
            })
            .map(|(kind, slot)| (kind, &self.entries[slot]))
    }

    /// Number of distinct full links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.full.len()
    }

    /// Returns `true` if the manifest had no usable records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Parses a manifest document.
    ///
    /// `Map` elements are matched case-insensitively, as are the `Link`,
    /// `ResolvedId`, and `Name` attributes. Records without a link are
    /// skipped; the id falls back to `Name` when `ResolvedId` is missing,
    /// and records with neither are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Xml`] if the document is not well-formed.
    pub fn parse(xml: &str, default_extension: &str) -> Result<Self, ManifestError> {
        let mut reader = Reader::from_str(xml);
        let mut index = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(element) | Event::Empty(element)) => {
                    if element.local_name().as_ref().eq_ignore_ascii_case(b"map") {
                        if let Some((link, id)) = read_record(&element)? {
                            index.insert(&link, &id, default_extension);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    return Err(ManifestError::Xml(format!(
                        "{err} at byte {}",
                        reader.error_position()
                    )))
                }
            }
        }
        Ok(index)
    }
}

/// Extracts `(link, id)` from a `Map` element.
fn read_record(element: &BytesStart<'_>) -> Result<Option<(String, String)>, ManifestError> {
    let mut link = None;
    let mut resolved_id = None;
    let mut name = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| ManifestError::Xml(e.to_string()))?;
        let key = attr.key.local_name();
        let slot = match key.as_ref() {
            k if k.eq_ignore_ascii_case(b"link") => &mut link,
            k if k.eq_ignore_ascii_case(b"resolvedid") => &mut resolved_id,
            k if k.eq_ignore_ascii_case(b"name") => &mut name,
            _ => continue,
        };
        let raw = std::str::from_utf8(&attr.value).map_err(|e| ManifestError::Xml(e.to_string()))?;
        let value = quick_xml::escape::unescape(raw).map_err(|e| ManifestError::Xml(e.to_string()))?;
        *slot = Some(value.trim().to_string());
    }

    let link = link.filter(|l| !l.is_empty());
    let id = resolved_id.or(name).filter(|id| !id.is_empty());
    Ok(link.zip(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<CatapultAliasFile>
  <Map Name="Install" Link="/Content/Setup/Install.htm" ResolvedId="1000" />
  <Map Name="Overview" Link="Content/a/b.htm" ResolvedId="IDX1" />
  <Map Name="Other B" Link="Content/c/b.htm" ResolvedId="IDX2" />
  <Map Name="Api" Link="Content/api/index.php" ResolvedId="API" />
  <Map Name="NoLink" ResolvedId="9" />
  <Map Name="Empty" Link="" ResolvedId="10" />
</CatapultAliasFile>"#;

    fn index() -> ManifestIndex {
        ManifestIndex::parse(MANIFEST, "htm").unwrap()
    }

    #[test]
    fn skips_records_without_link() {
        let index = index();
        assert_eq!(index.len(), 4);
        assert!(index.lookup("").is_none());
    }

    #[test]
    fn full_match_is_case_insensitive() {
        let index = index();
        let (kind, entry) = index.lookup("Content/A/B.htm").unwrap();
        assert_eq!(kind, MatchKind::Full);
        assert_eq!(entry.resolved_id, "IDX1");
        assert_eq!(entry.link, "content/a/b.htm");
    }

    #[test]
    fn content_stripped_match() {
        let index = index();
        let (kind, entry) = index.lookup("setup/install.htm").unwrap();
        assert_eq!(kind, MatchKind::ContentStripped);
        assert_eq!(entry.resolved_id, "1000");
    }

    #[test]
    fn file_name_match_is_lowest_precedence_and_last_write_wins() {
        let index = index();
        // Both content/a/b.htm and content/c/b.htm share the file-name key;
        // the later record owns it.
        let (kind, entry) = index.lookup("b.htm").unwrap();
        assert_eq!(kind, MatchKind::FileName);
        assert_eq!(entry.resolved_id, "IDX2");

        // A more precise key still beats the shared file name.
        let (kind, entry) = index.lookup("a/b.htm").unwrap();
        assert_eq!(kind, MatchKind::ContentStripped);
        assert_eq!(entry.resolved_id, "IDX1");
    }

    #[test]
    fn file_name_match_can_land_in_another_folder() {
        let index = index();
        let (kind, entry) = index.lookup("elsewhere/b.htm").unwrap();
        assert_eq!(kind, MatchKind::FileName);
        assert_eq!(entry.link, "content/c/b.htm");
    }

    #[test]
    fn identical_links_last_record_wins() {
        let xml = r#"<A><Map Link="Content/x.htm" ResolvedId="first"/><Map link="content/X.HTM" resolvedid="second"/></A>"#;
        let index = ManifestIndex::parse(xml, "htm").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("content/x.htm").unwrap().1.resolved_id, "second");
    }

    #[test]
    fn element_and_attribute_names_are_case_insensitive() {
        let xml = r#"<catapultaliasfile><MAP LINK="Content/Q.htm" RESOLVEDID="Q1"></MAP></catapultaliasfile>"#;
        let index = ManifestIndex::parse(xml, "htm").unwrap();
        assert_eq!(index.lookup("content/q.htm").unwrap().1.resolved_id, "Q1");
    }

    #[test]
    fn id_falls_back_to_name() {
        let xml = r#"<A><Map Link="Content/n.htm" Name="by-name"/><Map Link="Content/none.htm"/></A>"#;
        let index = ManifestIndex::parse(xml, "htm").unwrap();
        assert_eq!(index.lookup("content/n.htm").unwrap().1.resolved_id, "by-name");
        assert!(index.lookup("content/none.htm").is_none());
    }

    #[test]
    fn escaped_attribute_values_are_unescaped() {
        let xml = r#"<A><Map Link="Content/Q&amp;A.htm" ResolvedId="QA"/></A>"#;
        let index = ManifestIndex::parse(xml, "htm").unwrap();
        assert_eq!(index.lookup("Content/Q&A.htm").unwrap().1.resolved_id, "QA");
    }

    #[test]
    fn extensions_are_allow_listed() {
        assert_eq!(entry_extension("content/a.HTML", "htm"), "html");
        assert_eq!(entry_extension("content/api/index.php", "htm"), "php");
        assert_eq!(entry_extension("content/a.aspx", "htm"), "htm");
        assert_eq!(entry_extension("content/noext", "html"), "html");
        assert_eq!(entry_extension("content/a.ht-m", "htm"), "htm");
        assert_eq!(index().lookup("content/api/index.php").unwrap().1.extension, "php");
    }

    #[test]
    fn normalize_link_trims_leading_noise() {
        assert_eq!(normalize_link(" ./Content\\A.htm"), "content/a.htm");
        assert_eq!(normalize_link("//Content/A.htm"), "content/a.htm");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let xml = r#"<A><Map Link="Content/a.htm" ResolvedId="1"></Mop></A>"#;
        assert!(matches!(ManifestIndex::parse(xml, "htm"), Err(ManifestError::Xml(_))));
    }

    #[test]
    fn empty_document_is_an_empty_index() {
        assert!(ManifestIndex::parse("", "htm").unwrap().is_empty());
    }
}
