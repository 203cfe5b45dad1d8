//! Configuration loading for `docseo.toml`.
//!
//! Every field has a default, so the file is optional. Values given on the
//! command line override the file.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://doc.traefik.io"
//!
//! [sitemap]
//! lookback_hours = 48
//!
//! [git]
//! user_name = "traefiker"
//! token_path = "~/.github-token"
//! ```

mod error;
mod section;

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{GitConfig, SiteSectionConfig, SitemapConfig, TransformConfig};

use crate::cli::Commands;
use crate::{debug, log};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "docseo.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// File this config was read from, `None` for built-in defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub site: SiteSectionConfig,
    pub transform: TransformConfig,
    pub sitemap: SitemapConfig,
    pub git: GitConfig,
}

impl SiteConfig {
    /// Load configuration for the parsed command line.
    pub fn load(cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = match Self::resolve_config_path(cli.config.as_deref()) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
                Self::default()
            }
        };

        config.apply_command_options(&cli.command);
        config.normalize_token_path();
        config.validate(&cli.command)?;

        Ok(config)
    }

    /// An explicit `--config` is always used (a missing file is an error);
    /// otherwise `docseo.toml` is picked up only if present.
    fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG);
                path.exists().then_some(path)
            }
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Unknown fields are reported, never fatal: runs are unattended.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // command-line overrides
    // ========================================================================

    fn apply_command_options(&mut self, command: &Commands) {
        match command {
            Commands::Transform { args } => {
                Self::update_option(&mut self.site.url, args.site_url.as_ref());
                Self::update_option(&mut self.site.product, args.product.as_ref());
            }
            Commands::Sitemap { args } => {
                Self::update_option(&mut self.site.url, args.site_url.as_ref());
                Self::update_option(&mut self.git.user_name, args.git_user_name.as_ref());
                Self::update_option(&mut self.git.user_email, args.git_user_email.as_ref());
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Expand `~` in `git.token_path` and resolve it against the config file's directory.
    fn normalize_token_path(&mut self) {
        let Some(path) = self.git.token_path.take() else {
            return;
        };

        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(Path::new(""));

        self.git.token_path = Some(if expanded.is_relative() {
            base.join(expanded)
        } else {
            expanded
        });
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);

        match command {
            Commands::Transform { .. } => self.transform.validate(&mut diag),
            Commands::Sitemap { args } => {
                self.sitemap.validate(&mut diag);
                if !args.skip_commit {
                    self.git.validate(&mut diag);
                    let no_token = args.token.as_deref().is_none_or(str::is_empty);
                    if no_token && self.git.token_path.is_none() {
                        diag.error_with_hint(
                            GitConfig::TOKEN_PATH,
                            "no GitHub token to push the sitemap with",
                            "pass --token, set GITHUB_TOKEN, or use --skip-commit",
                        );
                    }
                }
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
