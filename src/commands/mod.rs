//! Command dispatch and handlers.

pub mod candidates;
pub mod index;
pub mod resolve;

use std::env;
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;

use crate::cli::Command;
use crate::config::ResolverConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `CSHLINK_REPLAY` names a cassette, network and clock interactions are
/// served from it. Otherwise, when `CSHLINK_RECORD` names a file, a live
/// session is recorded there.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    if let Command::Candidates { target, max_depth } = command {
        return candidates::run(target, *max_depth);
    }

    let ctx = if let Ok(path) = env::var("CSHLINK_REPLAY") {
        ServiceContext::replaying(Path::new(&path))?
    } else if let Ok(path) = env::var("CSHLINK_RECORD") {
        ServiceContext::recording(&PathBuf::from(path))
    } else {
        ServiceContext::live()
    };

    dispatch_with_context(command, &ctx)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Resolve { url, print_only, config } => {
            let config = load_config(config.config.as_deref())?;
            resolve::run(ctx, &config, url, *print_only)
        }
        Command::Index { manifest_url, lookup, config } => {
            let config = load_config(config.config.as_deref())?;
            index::run(ctx, &config, manifest_url, lookup.as_deref())
        }
        Command::Candidates { target, max_depth } => candidates::run(target, *max_depth),
    }
}

fn load_config(path: Option<&Path>) -> Result<ResolverConfig, String> {
    ResolverConfig::load(path).map_err(|e| e.to_string())
}

/// Single-threaded runtime for the network-bound commands.
fn runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}
