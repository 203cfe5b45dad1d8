use crate::utils::{date::DateTimeUtc, exec::require_program};
use anyhow::{Context, Result, anyhow};
use gix::Repository;
use std::path::{Path, PathBuf};

/// Header format understood by the change extractor: `<short hash> <timestamp>`.
const LOG_FORMAT: &str = "--format=%h %cd";
const LOG_DATE: &str = "--date=format:%Y-%m-%dT%H:%M:%S";

/// Find the working tree containing `path`.
pub fn discover_root(path: &Path) -> Result<PathBuf> {
    let repo = gix::discover(path)
        .with_context(|| format!("`{}` is not inside a git repository", path.display()))?;
    get_repo_root(&repo).map(Path::to_path_buf)
}

/// Get repository root path
pub(crate) fn get_repo_root(repo: &Repository) -> Result<&Path> {
    repo.path()
        .parent()
        .ok_or_else(|| anyhow!("Invalid repository path"))
}

/// Name-status history of `root`, oldest commit first, for commits after `after`.
///
/// Only the date part of `after` is passed to git, matching the day
/// granularity of sitemap `lastmod` values.
pub fn log_since(root: &Path, after: DateTimeUtc) -> Result<Vec<u8>> {
    let git = require_program("git")?;
    let after = format!("--after={}", after.to_date());

    let output = crate::exec!(
        root;
        git;
        "log", "--name-status", "--oneline", "--reverse", after, LOG_FORMAT, LOG_DATE
    )
    .context("Failed to read git history")?;

    Ok(output.stdout)
}
