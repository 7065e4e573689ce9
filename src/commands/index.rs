//! `cshlink index` command.

use super::runtime;
use crate::config::ResolverConfig;
use crate::context::ServiceContext;
use crate::manifest::ManifestIndexer;

/// Execute the `index` command.
///
/// Fetches the manifest directly (no cache), prints how many links it
/// holds, and optionally looks up one relative page path.
///
/// # Errors
///
/// Returns an error string if the manifest cannot be fetched or parsed, or
/// if the requested path has no entry.
pub fn run(
    ctx: &ServiceContext,
    config: &ResolverConfig,
    manifest_url: &str,
    lookup: Option<&str>,
) -> Result<(), String> {
    let indexer = ManifestIndexer::new(config);
    let index = runtime()?
        .block_on(indexer.fetch_index(ctx, manifest_url))
        .map_err(|e| e.to_string())?;

    println!("{manifest_url}: {} links", index.len());

    if let Some(target) = lookup {
        let (matched_by, entry) =
            index.lookup(target).ok_or_else(|| format!("No manifest entry for {target}"))?;
        println!("{target} -> {} ({matched_by} match, Default.{})", entry.resolved_id, entry.extension);
    }
    Ok(())
}
