//! Context resolution: where the documentation output and its alias manifest
//! live relative to the current page.
//!
//! Either the operator names the base/manifest explicitly, or candidate
//! bases are probed one by one until a manifest answers. Discovery never
//! fails; when nothing answers, a heuristic base is used.

pub mod candidates;

use url::{ParseError, Url};

use crate::config::{ResolverConfig, MANIFEST_RELATIVE_PATH};
use crate::context::ServiceContext;
use crate::paths::{decode_path, encode_path, join_base, normalize_base};
use crate::ports::http::{get_with_timeout, FetchRequest};

pub use candidates::{discovery_candidates, BaseCandidate, CandidateKind};

const COMPONENT: &str = "locate";

/// How a [`SiteContext`] was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSource {
    /// Taken from the operator override.
    Override,
    /// A probe for this candidate answered.
    Probed(CandidateKind),
    /// Every probe failed; guessed from the path.
    Heuristic,
}

/// Where the output lives and where the page sits inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    /// Absolute base path; ends in `/` only when it is `/`.
    pub base_path: String,
    /// Absolute path (or URL) of the alias manifest.
    pub manifest_path: String,
    /// Page path relative to `base_path`, never starting with `/`.
    pub target_relative_path: String,
    /// How the context was determined.
    pub source: ContextSource,
}

/// Conventional manifest location for a base path.
#[must_use]
pub fn manifest_path_for(base: &str) -> String {
    join_base(base, MANIFEST_RELATIVE_PATH)
}

/// `path` relative to `base`: the remainder after `base + "/"`, or the whole
/// path without its leading slash when the prefix does not match.
#[must_use]
pub fn relative_to_base(path: &str, base: &str) -> String {
    let prefix = format!("{base}/");
    path.strip_prefix(prefix.as_str())
        .unwrap_or_else(|| path.strip_prefix('/').unwrap_or(path))
        .to_string()
}

/// Absolute URL for a decoded site path on the page's origin.
///
/// Paths are re-encoded segment by segment, so a folder named `C# Guide`
/// stays a folder. A value that is already an absolute URL is parsed as is.
///
/// # Errors
///
/// Returns an error if the result is not a valid URL.
pub fn site_url(page: &Url, path: &str) -> Result<Url, ParseError> {
    if path.contains("://") {
        Url::parse(path)
    } else {
        page.join(&encode_path(path))
    }
}

/// Builds a context from the operator override, if one is configured.
///
/// No network access happens here.
#[must_use]
pub fn context_from_override(config: &ResolverConfig, page_path: &str) -> Option<SiteContext> {
    if !config.has_override() {
        return None;
    }
    let named = |value: &Option<String>| {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
    };

    let base_path = named(&config.base_path).map_or_else(|| "/".to_string(), |b| normalize_base(&b));
    let manifest_path = match named(&config.manifest_path) {
        Some(path) if path.contains("://") || path.starts_with('/') => path,
        Some(path) => format!("/{path}"),
        None => manifest_path_for(&base_path),
    };
    let target_relative_path = relative_to_base(page_path, &base_path);

    Some(SiteContext { base_path, manifest_path, target_relative_path, source: ContextSource::Override })
}

/// Determines the [`SiteContext`] for a page, probing over HTTP if needed.
pub struct ContextResolver<'a> {
    ctx: &'a ServiceContext,
    config: &'a ResolverConfig,
}

impl<'a> ContextResolver<'a> {
    /// Creates a resolver using the given ports and options.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a ResolverConfig) -> Self {
        Self { ctx, config }
    }

    /// Resolves the context for `page`. Never fails.
    pub async fn resolve(&self, page: &Url) -> SiteContext {
        let page_path = decode_path(page.path()).into_owned();

        if let Some(context) = context_from_override(self.config, &page_path) {
            self.ctx.logger.debug(
                COMPONENT,
                &format!("using configured base {} and manifest {}", context.base_path, context.manifest_path),
            );
            return context;
        }

        self.discover(page, &page_path).await
    }

    async fn discover(&self, page: &Url, page_path: &str) -> SiteContext {
        let candidates = discovery_candidates(page_path, self.config.max_probe_depth);

        for (attempt, candidate) in candidates.iter().enumerate() {
            if attempt > 0 && !self.config.probe_delay().is_zero() {
                tokio::time::sleep(self.config.probe_delay()).await;
            }
            let manifest_path = manifest_path_for(&candidate.base);
            if self.probe(page, &manifest_path).await {
                self.ctx.logger.debug(
                    COMPONENT,
                    &format!("found manifest at {manifest_path} ({})", candidate.kind),
                );
                return SiteContext {
                    target_relative_path: relative_to_base(page_path, &candidate.base),
                    base_path: candidate.base.clone(),
                    manifest_path,
                    source: ContextSource::Probed(candidate.kind),
                };
            }
        }

        let base_path = candidates::heuristic_base(page_path);
        let manifest_path = manifest_path_for(&base_path);
        self.ctx.logger.warn(
            COMPONENT,
            &format!(
                "no alias manifest found after {} probes; assuming base {base_path}",
                candidates.len()
            ),
        );
        SiteContext {
            target_relative_path: relative_to_base(page_path, &base_path),
            base_path,
            manifest_path,
            source: ContextSource::Heuristic,
        }
    }

    /// Returns `true` if `manifest_path` on the page's origin answers 2xx.
    async fn probe(&self, page: &Url, manifest_path: &str) -> bool {
        let Ok(url) = site_url(page, manifest_path) else {
            self.ctx.logger.debug(COMPONENT, &format!("skipping unjoinable path {manifest_path}"));
            return false;
        };
        let request = FetchRequest::probe(url.as_str());
        match get_with_timeout(self.ctx.http.as_ref(), &request, self.config.probe_timeout()).await
        {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                self.ctx.logger.debug(COMPONENT, &format!("probe {url} -> HTTP {}", response.status));
                false
            }
            Err(err) => {
                self.ctx.logger.debug(COMPONENT, &format!("probe {url} failed: {err}"));
                false
            }
        }
    }
}
