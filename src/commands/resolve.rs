//! `cshlink resolve` command.

use std::io::Write;

use super::runtime;
use crate::config::ResolverConfig;
use crate::context::ServiceContext;
use crate::handoff;
use crate::share::ShareLinkResolver;

/// Execute the `resolve` command.
///
/// Resolution itself never fails; the link is either the CSHID form or the
/// stripped page URL. With `print_only` the clipboard is left alone.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or stdout is closed.
pub fn run(
    ctx: &ServiceContext,
    config: &ResolverConfig,
    url: &str,
    print_only: bool,
) -> Result<(), String> {
    let link = runtime()?.block_on(ShareLinkResolver::new(ctx, config).resolve(url));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if print_only {
        writeln!(out, "{link}").map_err(|e| e.to_string())?;
        return Ok(());
    }

    handoff::deliver(ctx.clipboard.as_ref(), ctx.logger.as_ref(), &link, &mut out)
        .map_err(|e| e.to_string())?;
    Ok(())
}
