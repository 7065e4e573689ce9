//! Turns the current page URL into a shareable CSHID link.

use url::Url;

use crate::config::ResolverConfig;
use crate::context::ServiceContext;
use crate::locate::{site_url, ContextResolver, SiteContext};
use crate::manifest::{ManifestIndexer, MatchKind};
use crate::paths::{join_base, strip_transient};

const COMPONENT: &str = "share";

/// How a [`Resolution`] was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The page was found in the alias manifest.
    Cshid {
        /// Identifier placed in the fragment.
        id: String,
        /// Key space that matched.
        matched_by: MatchKind,
        /// Context the lookup ran against.
        context: SiteContext,
    },
    /// No identifier was found; the link is the stripped page URL.
    Fallback,
}

/// A resolved link and how it came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The link to hand to the user.
    pub url: String,
    /// Where the link came from.
    pub kind: ResolutionKind,
}

/// Resolves share links, keeping the parsed manifest cached between calls.
pub struct ShareLinkResolver<'a> {
    ctx: &'a ServiceContext,
    config: &'a ResolverConfig,
    manifests: ManifestIndexer,
}

impl<'a> ShareLinkResolver<'a> {
    /// Creates a resolver with an empty manifest cache.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a ResolverConfig) -> Self {
        Self { ctx, config, manifests: ManifestIndexer::new(config) }
    }

    /// The manifest indexer backing this resolver.
    #[must_use]
    pub fn manifests(&self) -> &ManifestIndexer {
        &self.manifests
    }

    /// Returns the link to share for `page_url`. Never fails.
    pub async fn resolve(&self, page_url: &str) -> String {
        self.resolve_detailed(page_url).await.url
    }

    /// Like [`resolve`](Self::resolve), also reporting how the link was built.
    pub async fn resolve_detailed(&self, page_url: &str) -> Resolution {
        let fallback = || Resolution {
            url: strip_transient(page_url).to_string(),
            kind: ResolutionKind::Fallback,
        };

        let page = match Url::parse(page_url) {
            Ok(page) if matches!(page.scheme(), "http" | "https") => page,
            Ok(page) => {
                self.ctx.logger.debug(COMPONENT, &format!("not resolving {} URL", page.scheme()));
                return fallback();
            }
            Err(err) => {
                self.ctx.logger.debug(COMPONENT, &format!("unparseable page URL {page_url}: {err}"));
                return fallback();
            }
        };
        self.ctx.note_page_url(page.as_str());

        let context = ContextResolver::new(self.ctx, self.config).resolve(&page).await;
        let Ok(manifest_url) = site_url(&page, &context.manifest_path) else {
            self.ctx
                .logger
                .warn(COMPONENT, &format!("cannot build manifest URL from {}", context.manifest_path));
            return fallback();
        };
        if manifest_url.origin() != page.origin() {
            self.ctx.logger.warn(
                COMPONENT,
                &format!("refusing manifest {manifest_url} outside the page's origin"),
            );
            return fallback();
        }

        let Some(found) = self
            .manifests
            .lookup(self.ctx, manifest_url.as_str(), &context.target_relative_path)
            .await
        else {
            return fallback();
        };

        let landing = join_base(&context.base_path, &format!("Default.{}", found.entry.extension));
        let link = match site_url(&page, &landing) {
            Ok(link) => link,
            Err(err) => {
                self.ctx.logger.warn(COMPONENT, &format!("cannot build link for {landing}: {err}"));
                return fallback();
            }
        };
        let id = found.entry.resolved_id;
        self.ctx.logger.debug(
            COMPONENT,
            &format!("{} -> {id} ({} match)", context.target_relative_path, found.matched_by),
        );

        Resolution {
            url: format!("{link}#cshid={id}"),
            kind: ResolutionKind::Cshid { id, matched_by: found.matched_by, context },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{CapturingLogger, StaticFetcher};
    use crate::locate::{CandidateKind, ContextSource};
    use crate::ports::LogLevel;
    use crate::test_support::context_with;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<CatapultAliasFile>
  <Map Name="Intro" Link="/Content/intro.htm" ResolvedId="1000" />
  <Map Name="Setup" Link="Content/setup/install.html" ResolvedId="SETUP_1" />
  <Map Name="Legacy" Link="Content/old/page.aspx" ResolvedId="LEGACY" />
</CatapultAliasFile>"#;

    fn config() -> ResolverConfig {
        ResolverConfig { probe_delay_ms: 0, probe_timeout_ms: 50, ..ResolverConfig::default() }
    }

    #[tokio::test]
    async fn builds_cshid_link_for_known_topic() {
        let fetcher =
            StaticFetcher::new().with_page("https://docs.example.com/Help/Data/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher, CapturingLogger::new());
        let config = config();
        let resolver = ShareLinkResolver::new(&ctx, &config);

        let resolution = resolver
            .resolve_detailed("https://docs.example.com/Help/Content/intro.htm?q=x#top")
            .await;

        assert_eq!(resolution.url, "https://docs.example.com/Help/Default.htm#cshid=1000");
        let ResolutionKind::Cshid { id, matched_by, context } = resolution.kind else {
            panic!("expected a CSHID resolution");
        };
        assert_eq!(id, "1000");
        assert_eq!(matched_by, MatchKind::Full);
        assert_eq!(context.source, ContextSource::Probed(CandidateKind::ContentRoot));
    }

    #[tokio::test]
    async fn landing_page_uses_entry_extension() {
        let fetcher = StaticFetcher::new().with_page("https://h/Data/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher, CapturingLogger::new());
        let config = config();
        let resolver = ShareLinkResolver::new(&ctx, &config);

        assert_eq!(
            resolver.resolve("https://h/Content/setup/install.html").await,
            "https://h/Default.html#cshid=SETUP_1"
        );
        assert_eq!(
            resolver.resolve("https://h/Content/old/page.aspx").await,
            "https://h/Default.htm#cshid=LEGACY"
        );
    }

    #[tokio::test]
    async fn all_probes_failing_yields_stripped_url() {
        let logger = CapturingLogger::new();
        let ctx = context_with(StaticFetcher::new(), logger.clone());
        let config = config();

        let link = ShareLinkResolver::new(&ctx, &config)
            .resolve("https://h/Docs/Content/a.htm?x=1#frag")
            .await;

        assert_eq!(link, "https://h/Docs/Content/a.htm");
        assert!(!logger.messages_at_least(LogLevel::Warn).is_empty());
    }

    #[tokio::test]
    async fn unknown_topic_yields_stripped_url() {
        let fetcher = StaticFetcher::new().with_page("https://h/Data/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher, CapturingLogger::new());
        let config = config();

        let resolution = ShareLinkResolver::new(&ctx, &config)
            .resolve_detailed("https://h/Content/nowhere.htm#x")
            .await;
        assert_eq!(resolution.url, "https://h/Content/nowhere.htm");
        assert_eq!(resolution.kind, ResolutionKind::Fallback);
    }

    #[tokio::test]
    async fn non_http_and_garbage_urls_degrade_without_requests() {
        let fetcher = StaticFetcher::new();
        let ctx = context_with(fetcher.clone(), CapturingLogger::new());
        let config = config();
        let resolver = ShareLinkResolver::new(&ctx, &config);

        assert_eq!(
            resolver.resolve("file:///C:/Help/Content/a.htm?x").await,
            "file:///C:/Help/Content/a.htm"
        );
        assert_eq!(resolver.resolve("not a url#frag").await, "not a url");
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn override_resolves_against_configured_manifest() {
        let fetcher = StaticFetcher::new().with_page("https://h/Meta/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher.clone(), CapturingLogger::new());
        let config = ResolverConfig {
            use_override: true,
            base_path: Some("/Help".to_string()),
            manifest_path: Some("/Meta/Alias.xml".to_string()),
            ..config()
        };

        let link =
            ShareLinkResolver::new(&ctx, &config).resolve("https://h/Help/Content/intro.htm").await;
        assert_eq!(link, "https://h/Help/Default.htm#cshid=1000");
        assert_eq!(fetcher.requested_urls(), vec!["https://h/Meta/Alias.xml"]);
    }

    #[tokio::test]
    async fn encoded_folder_names_resolve_to_cshid() {
        let fetcher =
            StaticFetcher::new().with_page("https://h/C%23%20Guide/Data/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher, CapturingLogger::new());
        let config = config();

        let link = ShareLinkResolver::new(&ctx, &config)
            .resolve("https://h/C%23%20Guide/Content/intro.htm")
            .await;
        assert_eq!(link, "https://h/C%23%20Guide/Default.htm#cshid=1000");
    }

    #[tokio::test]
    async fn cross_origin_override_manifest_is_refused() {
        let fetcher =
            StaticFetcher::new().with_page("https://other.example/Data/Alias.xml", MANIFEST);
        let logger = CapturingLogger::new();
        let ctx = context_with(fetcher.clone(), logger.clone());
        let config = ResolverConfig {
            use_override: true,
            manifest_path: Some("https://other.example/Data/Alias.xml".to_string()),
            ..config()
        };

        let link =
            ShareLinkResolver::new(&ctx, &config).resolve("https://h/Content/intro.htm?x").await;
        assert_eq!(link, "https://h/Content/intro.htm");
        assert!(fetcher.requests().is_empty());
        assert!(logger.messages_at_least(LogLevel::Warn).iter().any(|m| m.contains("origin")));
    }

    #[tokio::test]
    async fn same_origin_absolute_override_manifest_is_used() {
        let fetcher = StaticFetcher::new().with_page("https://h/Meta/Alias.xml", MANIFEST);
        let ctx = context_with(fetcher, CapturingLogger::new());
        let config = ResolverConfig {
            use_override: true,
            manifest_path: Some("https://h/Meta/Alias.xml".to_string()),
            ..config()
        };

        let link =
            ShareLinkResolver::new(&ctx, &config).resolve("https://h/Content/intro.htm").await;
        assert_eq!(link, "https://h/Default.htm#cshid=1000");
    }

    #[tokio::test]
    async fn repeated_resolutions_reuse_the_cached_manifest() {
        let manifest_url = "https://h/Data/Alias.xml";
        let fetcher = StaticFetcher::new().with_page(manifest_url, MANIFEST);
        let ctx = context_with(fetcher.clone(), CapturingLogger::new());
        let config = config();
        let resolver = ShareLinkResolver::new(&ctx, &config);

        let _ = resolver.resolve("https://h/Content/intro.htm").await;
        let _ = resolver.resolve("https://h/Content/setup/install.html").await;

        // One probe per resolution plus a single document fetch.
        assert_eq!(fetcher.hits(manifest_url), 3);
        assert_eq!(fetcher.requests().iter().filter(|r| r.read_body).count(), 1);
    }
}
