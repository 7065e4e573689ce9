//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `cshlink`.
#[derive(Debug, Parser)]
#[command(name = "cshlink", version, about = "Build shareable context-sensitive help links")]
pub struct Cli {
    /// Log resolution steps to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that read a resolver config.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// YAML resolver config (defaults to `CSHLINK_CONFIG`, then built-in defaults).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a page URL to its share link and copy it.
    Resolve {
        /// Page URL currently being viewed.
        url: String,
        /// Print the link without touching the clipboard.
        #[arg(long)]
        print_only: bool,
        /// Resolver config selection.
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// List the base paths discovery would probe, without probing.
    Candidates {
        /// Page URL or path.
        target: String,
        /// Number of ancestor directories to include.
        #[arg(long, value_name = "N", default_value_t = 6)]
        max_depth: usize,
    },
    /// Fetch an alias manifest and summarise it.
    Index {
        /// Absolute URL of the manifest.
        manifest_url: String,
        /// Look up a page path relative to the base.
        #[arg(long, value_name = "PATH")]
        lookup: Option<String>,
        /// Resolver config selection.
        #[command(flatten)]
        config: ConfigArgs,
    },
}
