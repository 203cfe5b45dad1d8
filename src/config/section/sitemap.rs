//! `[sitemap]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sitemap]
//! file_name = "sitemap.xml"   # Written at the documentation root, plus a .gz copy
//! lookback_hours = 48         # History window read in diff mode
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub file_name: String,
    pub lookback_hours: u32,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            file_name: "sitemap.xml".to_string(),
            lookback_hours: 48,
        }
    }
}

impl SitemapConfig {
    const FILE_NAME: FieldPath = FieldPath::new("sitemap.file_name");
    const LOOKBACK_HOURS: FieldPath = FieldPath::new("sitemap.lookback_hours");

    /// Name of the compressed copy.
    pub fn gz_file_name(&self) -> String {
        format!("{}.gz", self.file_name)
    }

    /// Both generated files, as staged by the commit step.
    pub fn output_files(&self) -> Vec<String> {
        vec![self.file_name.clone(), self.gz_file_name()]
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::FILE_NAME,
                format!("`{}` is not a plain file name", self.file_name),
                "the sitemap is always written at the documentation root",
            );
        }
        if self.lookback_hours == 0 {
            diag.error(Self::LOOKBACK_HOURS, "must be greater than zero");
        }
    }
}
