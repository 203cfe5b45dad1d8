//! `transform` command.

use super::TransformArgs;
use crate::config::SiteConfig;
use anyhow::Result;

/// Rewrite the documentation tree given by `--path`.
pub fn run(args: &TransformArgs, config: &SiteConfig) -> Result<()> {
    crate::transform::run(&args.path, config)?;
    Ok(())
}
