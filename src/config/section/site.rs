//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://doc.traefik.io"   # Root URL of the documentation site
//! product = "traefik"              # Optional, defaults to the transform path name
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Root URL, without the product segment.
    pub url: String,

    /// Product name used for canonical links and title suffixes.
    pub product: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            url: "https://doc.traefik.io".to_string(),
            product: String::new(),
        }
    }
}

impl SiteSectionConfig {
    const URL: FieldPath = FieldPath::new("site.url");

    /// Prefix of every sitemap location: the root URL with one trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}/", self.url.trim_end_matches('/'))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url.is_empty() {
            diag.error(Self::URL, "must not be empty");
            return;
        }

        match url::Url::parse(&self.url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => diag.error_with_hint(
                Self::URL,
                format!("unsupported scheme `{}`", parsed.scheme()),
                "use an http or https URL",
            ),
            Err(err) => diag.error(Self::URL, format!("invalid URL: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.url, "https://doc.traefik.io");
        assert!(config.site.product.is_empty());
    }

    #[test]
    fn test_base_url_single_trailing_slash() {
        let mut config = test_parse_config("");
        assert_eq!(config.site.base_url(), "https://doc.traefik.io/");

        config.site.url = "https://docs.example.com//".to_string();
        assert_eq!(config.site.base_url(), "https://docs.example.com/");
    }

    #[test]
    fn test_site_url_validation() {
        let mut diag = ConfigDiagnostics::new();
        test_parse_config("[site]\nurl = \"ftp://doc.example.com\"")
            .site
            .validate(&mut diag);
        test_parse_config("[site]\nurl = \"not a url\"")
            .site
            .validate(&mut diag);
        test_parse_config("[site]\nurl = \"\"").site.validate(&mut diag);
        assert_eq!(diag.len(), 3);

        let mut diag = ConfigDiagnostics::new();
        test_parse_config("[site]\nurl = \"http://localhost:8000\"")
            .site
            .validate(&mut diag);
        assert!(diag.is_empty());
    }
}
