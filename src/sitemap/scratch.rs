use super::{SitemapError, UrlEntry, UrlSet, is_versioned};
use crate::utils::date::DateTimeUtc;
use jwalk::WalkDir;
use std::fs;
use std::path::Path;

const PAGE_FILE: &str = "index.html";

/// Build a sitemap from the pages found under `root`.
///
/// Every `index.html` below a directory becomes `<base_url><dir>/`, dated
/// `today`. Dot directories and versioned paths are skipped. Any walk error
/// aborts the build.
pub fn from_scratch(root: &Path, base_url: &str, today: DateTimeUtc) -> Result<UrlSet, SitemapError> {
    // The walker reports a missing root lazily, check it up front.
    fs::metadata(root)?;

    let lastmod = today.to_date();
    let mut urls = Vec::new();

    for entry in WalkDir::new(root).skip_hidden(true) {
        let entry = entry?;
        if entry.file_type().is_dir() || entry.file_name() != PAGE_FILE {
            continue;
        }

        let Some(path) = page_path(root, &entry.path()) else {
            continue;
        };
        if is_versioned(&path) {
            continue;
        }
        urls.push(UrlEntry::daily(format!("{base_url}{path}"), lastmod.as_str()));
    }

    let mut set = UrlSet::new(urls);
    set.sort();
    Ok(set)
}

/// Site-relative directory of a page, with a trailing slash.
///
/// `None` for the root page itself, which has no directory.
fn page_path(root: &Path, file: &Path) -> Option<String> {
    let dir = file.strip_prefix(root).ok()?.parent()?;
    let segments: Vec<_> = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();

    if segments.is_empty() {
        return None;
    }
    Some(format!("{}/", segments.join("/")))
}
