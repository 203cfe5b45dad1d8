//! Commit and push of regenerated files.
//!
//! Shells out to `git` in the documentation root: configure the identity,
//! check `git status`, stage exactly the given files, commit, push.

use crate::{
    config::GitConfig,
    log,
    utils::exec::{Cmd, FilterRule, require_program},
};
use anyhow::{Context, Result};
use std::path::Path;

/// Push progress and hints are noise in batch logs.
const PUSH_FILTER: FilterRule = FilterRule::new(&["To ", "remote:", "hint:"]);

/// Identity used to author and push the commit.
#[derive(Debug, Clone, Default)]
pub struct GitIdentity {
    pub user_name: String,
    pub user_email: String,
    pub token: String,
}

/// Result of [`commit_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// None of the files show up in `git status`.
    Unchanged,
    /// A commit was created and pushed.
    Pushed,
}

/// Commit `files` (relative to `root`) and push them.
pub fn commit_files(
    root: &Path,
    files: &[String],
    identity: &GitIdentity,
    config: &GitConfig,
) -> Result<CommitOutcome> {
    let git = require_program("git")?;

    setup_user(&git, root, identity).context("Failed to set Git user")?;

    let status = Cmd::new(&git)
        .args(["status", "--porcelain"])
        .cwd(root)
        .run()
        .context("Failed to get Git status")?;

    if !has_diff(&String::from_utf8_lossy(&status.stdout), files) {
        log!("git"; "nothing to commit");
        return Ok(CommitOutcome::Unchanged);
    }

    Cmd::new(&git)
        .arg("add")
        .args(files)
        .cwd(root)
        .run()
        .context("Failed to add files")?;

    Cmd::new(&git)
        .args(["commit", "-m", config.message.as_str()])
        .cwd(root)
        .run()
        .context("Failed to commit")?;
    log!("git"; "committed {}", files.join(", "));

    let repo = format!("--repo=https://{}:@{}", identity.token, config.repository);
    Cmd::new(&git)
        .args(["push", repo.as_str(), config.remote.as_str(), config.branch.as_str()])
        .cwd(root)
        .secret(identity.token.as_str())
        .filter(&PUSH_FILTER)
        .run()
        .context("Failed to push")?;
    log!("git"; "pushed to {} {}", config.remote, config.branch);

    Ok(CommitOutcome::Pushed)
}

/// Set `user.email` and `user.name`, skipping empty values.
fn setup_user(git: &Path, root: &Path, identity: &GitIdentity) -> Result<()> {
    let entries = [
        ("user.email", identity.user_email.as_str()),
        ("user.name", identity.user_name.as_str()),
    ];

    for (key, value) in entries {
        if value.is_empty() {
            continue;
        }
        Cmd::new(git)
            .args(["config", key, value])
            .cwd(root)
            .run()?;
    }
    Ok(())
}

/// Whether `git status --porcelain` output lists any of `files`.
pub fn has_diff(status: &str, files: &[String]) -> bool {
    status
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .any(|line| files.iter().any(|file| line.ends_with(file.as_str())))
}
