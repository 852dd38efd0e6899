//! CLI for the brw fetcher.

mod commands;
mod render;

use anyhow::Result;
use brw_core::config;
use clap::{Parser, Subcommand};

use commands::{run_cache_purge, run_config, run_load};

/// Top-level CLI for brw.
#[derive(Debug, Parser)]
#[command(name = "brw")]
#[command(about = "brw: fetch http, https, file, data and view-source URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load a URL and print its text.
    Load {
        /// http(s)://, file://, data: or view-source: URL.
        url: String,

        /// Print the body as received instead of rendering it as text.
        #[arg(long)]
        raw: bool,

        /// Bypass the response cache for this load.
        #[arg(long)]
        no_cache: bool,
    },

    /// Manage the response cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show the config file path and effective settings.
    Config,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Remove every cached response.
    Purge,
}

impl CliCommand {
    /// Run the parsed command. Returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Load { url, raw, no_cache } => run_load(&cfg, &url, raw, no_cache),
            CliCommand::Cache {
                action: CacheAction::Purge,
            } => run_cache_purge(&cfg).map(|()| 0),
            CliCommand::Config => run_config(&cfg).map(|()| 0),
        }
    }
}

#[cfg(test)]
mod tests;
