//! `sitemap` command: generate, then commit and push.

use super::SitemapArgs;
use crate::config::SiteConfig;
use crate::log;
use crate::sitemap::generate;
use crate::utils::git::{CommitOutcome, GitIdentity, commit_files};
use anyhow::{Context, Result, bail};
use std::fs;

pub fn run(args: &SitemapArgs, config: &SiteConfig) -> Result<()> {
    let generated = generate(&args.root, config)?;
    log!(
        "sitemap";
        "wrote {} ({:?} mode, {} urls)",
        generated.path.display(),
        generated.mode,
        generated.entries
    );

    if args.skip_commit {
        log!("git"; "commit skipped");
        return Ok(());
    }

    let identity = resolve_identity(args, config)?;
    let files = config.sitemap.output_files();
    match commit_files(&args.root, &files, &identity, &config.git)? {
        CommitOutcome::Pushed => log!("git"; "sitemap published"),
        CommitOutcome::Unchanged => {}
    }
    Ok(())
}

/// Identity from the merged config; the token comes from `--token` or `git.token_path`.
fn resolve_identity(args: &SitemapArgs, config: &SiteConfig) -> Result<GitIdentity> {
    let token = match args.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => token.to_string(),
        None => read_token(config)?,
    };

    Ok(GitIdentity {
        user_name: config.git.user_name.clone(),
        user_email: config.git.user_email.clone(),
        token,
    })
}

fn read_token(config: &SiteConfig) -> Result<String> {
    let Some(path) = &config.git.token_path else {
        bail!("no GitHub token: pass --token or set git.token_path");
    };
    let token = fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;

    let token = token.trim();
    if token.is_empty() {
        bail!("token file {} is empty", path.display());
    }
    Ok(token.to_string())
}
