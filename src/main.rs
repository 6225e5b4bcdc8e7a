#![allow(dead_code)]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log level for this crate's own targets when RUST_LOG is unset
const DEFAULT_DIRECTIVE: &str = concat!(env!("CARGO_CRATE_NAME"), "=info");

fn main() -> Result<()> {
    // stdout carries prop/dream/info output, so logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.run()
}
