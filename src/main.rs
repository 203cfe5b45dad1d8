//! docseo - SEO post-processing for versioned documentation sites.

mod cli;
mod config;
mod logger;
mod sitemap;
mod transform;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.is_verbose());

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Transform { args } => cli::transform::run(args, &config),
        Commands::Sitemap { args } => cli::sitemap::run(args, &config),
    }
}
