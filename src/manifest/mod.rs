//! Alias manifest retrieval, parsing, and cached lookup.

pub mod cache;
pub mod index;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::ResolverConfig;
use crate::context::ServiceContext;
use crate::ports::http::{get_with_timeout, FetchRequest, HttpError};

pub use cache::ManifestCache;
pub use index::{ManifestEntry, ManifestIndex, MatchKind};

const COMPONENT: &str = "manifest";

/// Reasons a manifest could not be turned into an index.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Transport failure or timeout.
    #[error("failed to fetch manifest {url}: {source}")]
    Fetch {
        /// Manifest URL.
        url: String,
        /// Underlying error.
        source: HttpError,
    },
    /// The server answered with a non-2xx status.
    #[error("manifest {url} answered HTTP {status}")]
    Status {
        /// Manifest URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The body exceeded the configured size limit.
    #[error("manifest {url} exceeds {limit} bytes")]
    TooLarge {
        /// Manifest URL.
        url: String,
        /// Size limit in bytes.
        limit: u64,
    },
    /// The document is not well-formed XML.
    #[error("malformed manifest: {0}")]
    Xml(String),
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMatch {
    /// The matched record.
    pub entry: ManifestEntry,
    /// Key space that matched.
    pub matched_by: MatchKind,
}

/// Fetches manifests and answers lookups through a [`ManifestCache`].
pub struct ManifestIndexer {
    cache: ManifestCache,
    default_extension: String,
    timeout: Duration,
    max_bytes: u64,
    refetch_on_miss: bool,
}

impl ManifestIndexer {
    /// Creates an indexer with an empty cache sized from `config`.
    #[must_use]
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            cache: ManifestCache::new(config.cache_ttl()),
            default_extension: config.default_extension.clone(),
            timeout: config.manifest_timeout(),
            max_bytes: config.max_manifest_bytes,
            refetch_on_miss: config.refetch_on_miss,
        }
    }

    /// The underlying cache.
    #[must_use]
    pub fn cache(&self) -> &ManifestCache {
        &self.cache
    }

    /// Finds the record for `target` in the manifest at `manifest_url`.
    ///
    /// Uses the cached index while it is fresh and rebuilds it otherwise.
    /// When a cached index has no match, it is refetched once before giving
    /// up. Every failure is logged and reported as `None`.
    pub async fn lookup(
        &self,
        ctx: &ServiceContext,
        manifest_url: &str,
        target: &str,
    ) -> Option<ManifestMatch> {
        let now = ctx.clock.now();

        let (index, cached) = match self.cache.get(manifest_url, now) {
            Some(index) => (index, true),
            None => (self.rebuild(ctx, manifest_url, now).await?, false),
        };
        if let Some(found) = Self::find(&index, target) {
            return Some(found);
        }

        if cached && self.refetch_on_miss {
            ctx.logger.debug(COMPONENT, &format!("{target} not in cached manifest; refetching"));
            self.cache.invalidate();
            let index = self.rebuild(ctx, manifest_url, now).await?;
            if let Some(found) = Self::find(&index, target) {
                return Some(found);
            }
        }

        ctx.logger.warn(COMPONENT, &format!("no manifest entry for {target}"));
        None
    }

    fn find(index: &ManifestIndex, target: &str) -> Option<ManifestMatch> {
        index
            .lookup(target)
            .map(|(matched_by, entry)| ManifestMatch { entry: entry.clone(), matched_by })
    }

    async fn rebuild(
        &self,
        ctx: &ServiceContext,
        manifest_url: &str,
        now: DateTime<Utc>,
    ) -> Option<Arc<ManifestIndex>> {
        match self.fetch_index(ctx, manifest_url).await {
            Ok(index) => {
                ctx.logger.debug(
                    COMPONENT,
                    &format!("indexed {} links from {manifest_url}", index.len()),
                );
                Some(self.cache.put(manifest_url, index, now))
            }
            Err(err) => {
                ctx.logger.warn(COMPONENT, &err.to_string());
                None
            }
        }
    }

    /// Fetches and parses the manifest, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, non-2xx status,
    /// oversized body, or malformed XML.
    pub async fn fetch_index(
        &self,
        ctx: &ServiceContext,
        manifest_url: &str,
    ) -> Result<ManifestIndex, ManifestError> {
        let request = FetchRequest::document(manifest_url, self.max_bytes);
        let too_large = || ManifestError::TooLarge { url: manifest_url.to_string(), limit: self.max_bytes };

        let response = match get_with_timeout(ctx.http.as_ref(), &request, self.timeout).await {
            Ok(response) => response,
            Err(HttpError::TooLarge { .. }) => return Err(too_large()),
            Err(source) => {
                return Err(ManifestError::Fetch { url: manifest_url.to_string(), source })
            }
        };
        if !response.is_success() {
            return Err(ManifestError::Status {
                url: manifest_url.to_string(),
                status: response.status,
            });
        }
        let declared = response.content_length.unwrap_or(0);
        let actual = u64::try_from(response.body.len()).unwrap_or(u64::MAX);
        if declared.max(actual) > self.max_bytes {
            return Err(too_large());
        }

        ManifestIndex::parse(&response.body, &self.default_extension)
    }
}
