use regex::Regex;
use std::sync::LazyLock;

/// `product/master/...` or `product/vX.Y/...`.
static VERSIONED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^/]+/(?:master|v\d+\.\d+)/").expect("valid version pattern")
});

/// Whether a site-relative path belongs to a versioned snapshot.
///
/// Versioned pages never appear in the merged sitemap. The scratch builder
/// and the change extractor both filter with this one rule.
pub fn is_versioned(path: &str) -> bool {
    VERSIONED.is_match(path)
}
