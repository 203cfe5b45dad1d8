//! Sitemap generation: pick scratch or diff mode, then persist.

use super::xml::write_document;
use super::{UrlSet, extract_changes, from_scratch, merge};
use crate::config::SiteConfig;
use crate::utils::date::DateTimeUtc;
use crate::utils::git::{discover_root, log_since};
use crate::utils::plural::plural_count;
use crate::{debug, log};
use anyhow::{Context, Result};
use flate2::{Compression, GzBuilder};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// How the sitemap was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No sitemap yet: scan the tree.
    Scratch,
    /// Existing sitemap: merge recent history into it.
    Diff,
}

impl Mode {
    /// Diff mode whenever the sitemap file exists.
    pub fn detect(sitemap: &Path) -> Self {
        if sitemap.exists() {
            Self::Diff
        } else {
            Self::Scratch
        }
    }
}

/// Result of [`generate`].
#[derive(Debug, Clone)]
pub struct Generated {
    pub mode: Mode,
    /// Plain XML file; the gzip copy sits next to it.
    pub path: PathBuf,
    pub entries: usize,
}

/// Build or update `<root>/sitemap.xml` and its gzip copy.
pub fn generate(root: &Path, config: &SiteConfig) -> Result<Generated> {
    let path = root.join(&config.sitemap.file_name);
    let base_url = config.site.base_url();
    let mode = Mode::detect(&path);

    let set = match mode {
        Mode::Scratch => {
            log!("sitemap"; "from scratch {}", path.display());
            from_scratch(root, &base_url, DateTimeUtc::now())
                .with_context(|| format!("Failed to scan {}", root.display()))?
        }
        Mode::Diff => {
            log!("sitemap"; "from diff {}", path.display());
            warn_if_not_repo_root(root)?;

            let after = DateTimeUtc::now().sub_hours(config.sitemap.lookback_hours);
            let history = log_since(root, after)?;
            from_diff(&path, history.as_slice(), &base_url)?
        }
    };

    debug_assert!(set.is_sorted());
    if set.is_empty() {
        log!("warning"; "no pages found under {}", root.display());
    }
    persist(&path, &set)?;

    Ok(Generated {
        mode,
        path,
        entries: set.len(),
    })
}

/// History paths are relative to the repository root, so the documentation
/// root is expected to be that root.
fn warn_if_not_repo_root(root: &Path) -> Result<()> {
    let repo_root = discover_root(root)?;
    let same = match (fs::canonicalize(root), fs::canonicalize(&repo_root)) {
        (Ok(a), Ok(b)) => a == b,
        _ => true,
    };
    if !same {
        log!(
            "warning";
            "{} is not the repository root {}, history paths may not match",
            root.display(),
            repo_root.display()
        );
    }
    Ok(())
}

/// Merge `history` into the sitemap stored at `sitemap`.
pub fn from_diff<R: BufRead>(sitemap: &Path, history: R, base_url: &str) -> Result<UrlSet> {
    let file =
        File::open(sitemap).with_context(|| format!("Failed to open {}", sitemap.display()))?;
    let current = UrlSet::read(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", sitemap.display()))?;

    let changes = extract_changes(history, base_url).context("Failed to read history")?;
    log!(
        "sitemap";
        "current {}, {}",
        plural_count(current.len(), "entry"),
        plural_count(changes.len(), "change")
    );

    let merged = merge(current, changes, base_url);
    log!("sitemap"; "new {}", plural_count(merged.len(), "entry"));

    Ok(merged)
}

/// Write `set` to `path` and to `path.gz` from a single byte stream.
///
/// A failed write may leave either file truncated.
pub fn persist(path: &Path, set: &UrlSet) -> Result<()> {
    let gz_path = gz_path(path);
    let stored_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let plain =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let compressed =
        File::create(&gz_path).with_context(|| format!("Failed to create {}", gz_path.display()))?;
    let encoder = GzBuilder::new()
        .filename(stored_name)
        .write(compressed, Compression::default());

    let mut out = FanOut {
        first: BufWriter::new(plain),
        second: encoder,
    };
    write_document(&mut out, set).with_context(|| format!("Failed to write {}", path.display()))?;
    out.first
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    out.second
        .finish()
        .with_context(|| format!("Failed to write {}", gz_path.display()))?;

    debug!("sitemap"; "wrote {} and {}", path.display(), gz_path.display());
    Ok(())
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Writes every byte to both sinks.
struct FanOut<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Write for FanOut<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
