//! repolens - A bounded, ignore-aware repository viewer
//!
//! repolens provides:
//! - A depth- and width-limited directory tree with summaries
//! - Size- and line-limited text file reads with language detection
//! - .gitignore-aware exclusion and root containment for every path
//! - A line-oriented stdio session for agent tooling

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;
mod session;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli)
}
