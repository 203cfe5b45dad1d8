//! SEO rewrite of a built documentation tree.
//!
//! Every file under the tree is offered to the transforms in order; the
//! first one whose pattern matches handles it:
//!
//! | Transform  | Matches                      | Effect                            |
//! |------------|------------------------------|-----------------------------------|
//! | `Page`     | `<dir>/vX.Y/<rel>.html`      | canonical, robots, title, https   |
//! | `Sitemap`  | `.../vX.Y/.../sitemap.xml`   | deletes the file                  |

mod page;
mod sitemap;

pub use page::PageTransform;
pub use sitemap::SitemapTransform;

use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Name used when neither `--product` nor the path provides one.
const FALLBACK_PRODUCT: &str = ".";

/// The fixed set of file transforms.
#[derive(Debug, Clone)]
pub enum FileTransform {
    Page(PageTransform),
    Sitemap(SitemapTransform),
}

impl FileTransform {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Page(_) => PageTransform::matches(path),
            Self::Sitemap(_) => SitemapTransform::matches(path),
        }
    }

    pub fn apply(&self, path: &Path) -> Result<()> {
        match self {
            Self::Page(t) => t.apply(path),
            Self::Sitemap(t) => t.apply(path),
        }
    }
}

/// Transforms in match order.
#[derive(Debug, Clone)]
pub struct Transforms([FileTransform; 2]);

impl Transforms {
    pub fn new(product: &str, config: &SiteConfig) -> Result<Self> {
        let page = PageTransform::new(product, &config.site.url, &config.transform)?;
        Ok(Self([
            FileTransform::Page(page),
            FileTransform::Sitemap(SitemapTransform),
        ]))
    }

    /// First transform matching `path`.
    pub fn select(&self, path: &str) -> Option<&FileTransform> {
        self.0.iter().find(|t| t.matches(path))
    }
}

/// Files handled by [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub sitemaps: usize,
}

/// Rewrite the tree at `path`.
///
/// The walk finishes before any file is touched, so deleted sitemaps never
/// disturb it. Files are then processed in parallel; the first error aborts.
pub fn run(path: &Path, config: &SiteConfig) -> Result<Summary> {
    let product = product_name(path, &config.site.product);
    log!("transform"; "{} as product `{}`", path.display(), product);

    fs::metadata(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let transforms = Transforms::new(&product, config)?;
    let mut jobs: Vec<(PathBuf, &FileTransform)> = Vec::new();

    for entry in WalkDir::new(path).skip_hidden(false) {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let file = entry.path();
        if let Some(transform) = transforms.select(&file.to_string_lossy()) {
            jobs.push((file, transform));
        }
    }

    jobs.par_iter()
        .try_for_each(|(file, transform)| transform.apply(file))?;

    let summary = jobs.iter().fold(Summary::default(), |mut acc, (_, t)| {
        match t {
            FileTransform::Page(_) => acc.pages += 1,
            FileTransform::Sitemap(_) => acc.sitemaps += 1,
        }
        acc
    });
    log!(
        "transform";
        "{} processed, {} deleted",
        plural_count(summary.pages, "page"),
        plural_count(summary.sitemaps, "sitemap")
    );

    Ok(summary)
}

/// Explicit product, else the last component of `path`, else `.`.
pub fn product_name(path: &Path, product: &str) -> String {
    if !product.is_empty() {
        return product.to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PRODUCT.to_string())
}
