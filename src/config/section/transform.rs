//! `[transform]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [transform]
//! max_title_length = 65        # Longer titles are cut before the suffix
//! robots = "index, nofollow"   # Content of the inserted robots meta tag
//! https_upgrade = true         # Rewrite src="http:// and href="http://
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Maximum title length in bytes, suffix included.
    pub max_title_length: usize,

    /// Robots directive for versioned pages.
    pub robots: String,

    /// Upgrade `http://` links and sources to `https://`.
    pub https_upgrade: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_title_length: 65,
            robots: "index, nofollow".to_string(),
            https_upgrade: true,
        }
    }
}

impl TransformConfig {
    const MAX_TITLE_LENGTH: FieldPath = FieldPath::new("transform.max_title_length");
    const ROBOTS: FieldPath = FieldPath::new("transform.robots");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_title_length == 0 {
            diag.error(Self::MAX_TITLE_LENGTH, "must be greater than zero");
        }
        if self.robots.trim().is_empty() {
            diag.error_with_hint(
                Self::ROBOTS,
                "must not be empty",
                "e.g. \"index, nofollow\"",
            );
        }
    }
}
