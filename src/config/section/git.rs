//! `[git]` section configuration.
//!
//! Identity and push target for committing the regenerated sitemap.
//!
//! # Example
//!
//! ```toml
//! [git]
//! user_name = "traefiker"
//! user_email = "30906710+traefiker@users.noreply.github.com"
//! token_path = "~/.github-token"   # Optional: read when no --token is given
//! remote = "origin"
//! branch = "master"
//! repository = "github.com/traefik/doc.git"
//! message = "Update sitemap files"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub user_name: String,
    pub user_email: String,

    /// File holding a GitHub token.
    ///
    /// Keep it outside the repository, e.g. `~/.github-token`.
    pub token_path: Option<PathBuf>,

    pub remote: String,
    pub branch: String,

    /// Host and path of the pushed repository, without scheme.
    pub repository: String,

    /// Commit message.
    pub message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            user_email: String::new(),
            token_path: None,
            remote: "origin".to_string(),
            branch: "master".to_string(),
            repository: "github.com/traefik/doc.git".to_string(),
            message: "Update sitemap files".to_string(),
        }
    }
}

impl GitConfig {
    pub(crate) const TOKEN_PATH: FieldPath = FieldPath::new("git.token_path");
    const REMOTE: FieldPath = FieldPath::new("git.remote");
    const BRANCH: FieldPath = FieldPath::new("git.branch");
    const REPOSITORY: FieldPath = FieldPath::new("git.repository");
    const MESSAGE: FieldPath = FieldPath::new("git.message");

    /// # Checks
    /// - `token_path`, when set, must be an existing file.
    /// - push target and message must not be empty.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(path) = &self.token_path {
            if !path.exists() {
                diag.error(
                    Self::TOKEN_PATH,
                    format!("file not found: {}", path.display()),
                );
            } else if !path.is_file() {
                diag.error(
                    Self::TOKEN_PATH,
                    format!("not a file: {}", path.display()),
                );
            }
        }

        let required = [
            (Self::REMOTE, &self.remote),
            (Self::BRANCH, &self.branch),
            (Self::REPOSITORY, &self.repository),
            (Self::MESSAGE, &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                diag.error(field, "must not be empty");
            }
        }

        if self.repository.contains("://") {
            diag.error_with_hint(
                Self::REPOSITORY,
                "must not include a scheme",
                "e.g. \"github.com/traefik/doc.git\"",
            );
        }
    }
}
