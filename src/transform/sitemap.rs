use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Sitemaps generated inside a versioned snapshot.
static VERSIONED_SITEMAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/v\d+\.\d+/.*sitemap\.xml(\.gz)?$").expect("valid sitemap pattern")
});

/// Removes per-version sitemaps; only the merged root sitemap is published.
#[derive(Debug, Clone, Copy, Default)]
pub struct SitemapTransform;

impl SitemapTransform {
    pub fn matches(path: &str) -> bool {
        VERSIONED_SITEMAP.is_match(path)
    }

    pub fn apply(&self, path: &Path) -> Result<()> {
        log!("sitemap"; "{} deleted", path.display());
        fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        assert!(SitemapTransform::matches("site/traefik/v2.10/sitemap.xml"));
        assert!(SitemapTransform::matches("site/traefik/v2.10/sitemap.xml.gz"));
        assert!(SitemapTransform::matches("site/traefik/v2.10/nested/sitemap.xml"));
        assert!(!SitemapTransform::matches("site/traefik/sitemap.xml"));
        assert!(!SitemapTransform::matches("site/traefik/v2.10/sitemap.xml.bak"));
        assert!(!SitemapTransform::matches("site/traefik/v2/sitemap.xml"));
    }

    #[test]
    fn test_apply_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        fs::write(&path, "<urlset/>").unwrap();

        SitemapTransform.apply(&path).unwrap();
        assert!(!path.exists());
        assert!(SitemapTransform.apply(&path).is_err());
    }
}
