//! Merged sitemap of the unversioned documentation pages.
//!
//! The sitemap is either built from the file tree ([`from_scratch`]) or
//! reconciled with recent history ([`extract_changes`] then [`merge`]).
//! [`generate`] picks the mode and persists the result.

mod diff;
mod error;
mod generate;
mod merge;
mod scratch;
mod version;
mod xml;

pub use diff::{ChangeSet, extract_changes};
pub use error::SitemapError;
pub use generate::generate;
pub use merge::merge;
pub use scratch::from_scratch;
pub use version::is_versioned;

use std::fmt;
use std::str::FromStr;

/// Namespace of the `<urlset>` root element.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// URL set
// ============================================================================

/// A sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSet {
    pub xmlns: String,
    pub urls: Vec<UrlEntry>,
}

impl Default for UrlSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl UrlSet {
    /// Set in the standard sitemap namespace.
    pub fn new(urls: Vec<UrlEntry>) -> Self {
        Self {
            xmlns: SITEMAP_NS.to_string(),
            urls,
        }
    }

    /// Order entries by location.
    pub fn sort(&mut self) {
        self.urls.sort_by(|a, b| a.loc.cmp(&b.loc));
    }

    pub fn is_sorted(&self) -> bool {
        self.urls.is_sorted_by(|a, b| a.loc <= b.loc)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// One `<url>` element. Identified by `loc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// Absolute URL.
    pub loc: String,
    /// `YYYY-MM-DD`, kept verbatim from the source document.
    pub lastmod: String,
    pub changefreq: Option<ChangeFreq>,
    /// Written only when non-zero.
    pub priority: Option<u32>,
}

impl UrlEntry {
    /// Entry as produced by the builders: refreshed daily, no priority.
    pub fn daily(loc: impl Into<String>, lastmod: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: lastmod.into(),
            changefreq: Some(ChangeFreq::Daily),
            priority: None,
        }
    }
}

// ============================================================================
// changefreq
// ============================================================================

/// Values allowed in `<changefreq>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(SitemapError::InvalidChangeFreq(other.to_string())),
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
