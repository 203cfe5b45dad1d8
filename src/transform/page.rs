//! SEO rewrite of pages under a versioned directory.
//!
//! For `<dir>/vX.Y/<rel>.html`:
//! - canonical link to the unversioned page, when `<dir>/<rel>.html` exists
//! - robots meta tag
//! - `| Product | vX.Y` title suffix
//! - `http://` sources and links upgraded to `https://`

use crate::config::TransformConfig;
use crate::log;
use crate::utils::html::{escape, escape_attr, title_case, unescape};
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tl::{HTMLTag, Node, Parser, ParserOptions};
use url::Url;

/// `<dir>/<version>/<rel>.html`, the last version segment wins.
static PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)/(v\d+\.\d+)/(.*\.html)$").expect("valid page pattern"));

/// Traefik middleware pages moved under `middlewares/http/`.
static MIDDLEWARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^middlewares/([^/]+/[^/]+.html)").expect("valid middleware pattern")
});

/// Product whose middleware pages are remapped.
const TRAEFIK: &str = "traefik";

/// A page path split around its version segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VersionedPage<'a> {
    dir: &'a str,
    version: &'a str,
    rel: &'a str,
}

impl<'a> VersionedPage<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let caps = PAGE.captures(path)?;
        Some(Self {
            dir: caps.get(1)?.as_str(),
            version: caps.get(2)?.as_str(),
            rel: caps.get(3)?.as_str(),
        })
    }

    /// Same page outside the versioned snapshot.
    fn counterpart(&self) -> std::path::PathBuf {
        Path::new(self.dir).join(self.rel)
    }
}

/// Head edits, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Canonical,
    Robots,
    Title,
}

impl Edit {
    fn module(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Robots => "robots",
            Self::Title => "title",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::Canonical => "adding canonical link",
            Self::Robots => "adding meta robots",
            Self::Title => "adding title suffix",
        }
    }
}

/// Replace `start..end` of the source with `text`.
#[derive(Debug)]
struct Splice {
    start: usize,
    end: usize,
    text: String,
}

#[derive(Debug, Clone)]
pub struct PageTransform {
    product: String,
    /// Product as shown in titles: `traefik-enterprise` → `Traefik Enterprise`.
    product_title: String,
    /// Site root with a trailing slash.
    site_url: Url,
    config: TransformConfig,
}

impl PageTransform {
    pub fn new(product: &str, site_url: &str, config: &TransformConfig) -> Result<Self> {
        let site_url = Url::parse(&format!("{}/", site_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid site URL `{site_url}`"))?;

        Ok(Self {
            product: product.to_string(),
            product_title: title_case(&product.replace('-', " ")),
            site_url,
            config: config.clone(),
        })
    }

    pub fn matches(path: &str) -> bool {
        PAGE.is_match(path)
    }

    /// Rewrite the page in place.
    pub fn apply(&self, path: &Path) -> Result<()> {
        let name = path.to_string_lossy();
        let page =
            VersionedPage::parse(&name).ok_or_else(|| anyhow!("version not found: {name}"))?;

        let html =
            fs::read_to_string(path).with_context(|| format!("Failed to read {name}"))?;
        let has_counterpart = page.counterpart().exists();

        let (rewritten, edits) = self.rewrite(&html, &page, has_counterpart)?;
        for edit in edits {
            log!(edit.module(); "{} {}", name, edit.message());
        }

        if rewritten != html {
            fs::write(path, rewritten).with_context(|| format!("Failed to write {name}"))?;
        }
        Ok(())
    }

    fn rewrite(
        &self,
        html: &str,
        page: &VersionedPage<'_>,
        has_counterpart: bool,
    ) -> Result<(String, Vec<Edit>)> {
        let mut splices = Vec::new();
        let mut edits = Vec::new();

        {
            let dom = tl::parse(html, ParserOptions::default())
                .map_err(|err| anyhow!("Failed to parse HTML: {err:?}"))?;
            let parser = dom.parser();

            let head = dom
                .query_selector("head")
                .and_then(|mut found| found.next())
                .and_then(|handle| handle.get(parser))
                .and_then(Node::as_tag);

            if let Some(head) = head {
                let lower = html.to_ascii_lowercase();
                let mut appended = String::new();

                if has_counterpart && !has_canonical(head, parser) {
                    let href = self.canonical_url(page.rel)?;
                    appended.push_str(&format!(
                        r#"<link rel="canonical" href="{}" />"#,
                        escape_attr(&href)
                    ));
                    edits.push(Edit::Canonical);
                }

                if !has_robots(head, parser, &self.config.robots) {
                    appended.push_str(&format!(
                        r#"<meta name="robots" content="{}" />"#,
                        escape_attr(&self.config.robots)
                    ));
                    edits.push(Edit::Robots);
                }

                if let Some(title) = tags(head, parser, "title").next()
                    && let Some((start, end)) = inner_span(html, &lower, title, "</title")
                {
                    let text = unescape(&title.inner_text(parser)).into_owned();
                    if let Some(new_title) = self.suffixed_title(&text, page.version) {
                        splices.push(Splice {
                            start,
                            end,
                            text: escape(&new_title).into_owned(),
                        });
                        edits.push(Edit::Title);
                    }
                }

                if !appended.is_empty()
                    && let Some((_, end)) = inner_span(html, &lower, head, "</head")
                {
                    splices.push(Splice {
                        start: end,
                        end,
                        text: appended,
                    });
                }
            }
        }

        let mut out = html.to_string();
        splices.sort_by(|a, b| b.start.cmp(&a.start));
        for splice in splices {
            out.replace_range(splice.start..splice.end, &splice.text);
        }

        if self.config.https_upgrade {
            out = upgrade_https(&out);
        }
        Ok((out, edits))
    }

    /// `<site>/<product>/<dir of rel>/`
    fn canonical_url(&self, rel: &str) -> Result<String> {
        let rel = match MIDDLEWARE.captures(rel) {
            Some(caps) if self.product == TRAEFIK => format!("middlewares/http/{}", &caps[1]),
            _ => rel.to_string(),
        };
        let dir = rel.rsplit_once('/').map_or("", |(dir, _)| dir);

        let joined = join_url_path(&[self.product.as_str(), dir]);
        let url = self
            .site_url
            .join(&joined)
            .with_context(|| format!("Failed to build canonical URL for `{rel}`"))?;

        Ok(format!("{}/", url.as_str().trim_end_matches('/')))
    }

    /// New title text, or `None` when the suffix is already there.
    fn suffixed_title(&self, title: &str, version: &str) -> Option<String> {
        let suffix = format!("| {} | {}", self.product_title, version);
        if title.contains(&suffix) {
            return None;
        }

        let stripped = title.replace(&format!(" - {}", self.product_title), "");
        let new_title = format!("{stripped} {suffix}");
        if new_title.len() <= self.config.max_title_length {
            return Some(new_title);
        }

        let keep = self
            .config
            .max_title_length
            .saturating_sub(suffix.len())
            .saturating_sub(4);
        Some(format!("{}... {}", truncate(title, keep), suffix))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Descendant tags of `parent` with the given name.
fn tags<'p, 'a: 'p>(
    parent: &'p HTMLTag<'a>,
    parser: &'p Parser<'a>,
    name: &'p str,
) -> impl Iterator<Item = &'p HTMLTag<'a>> + 'p {
    parent
        .query_selector(parser, name)
        .into_iter()
        .flatten()
        .filter_map(move |handle| handle.get(parser))
        .filter_map(Node::as_tag)
}

fn attr(tag: &HTMLTag<'_>, name: &'static str) -> Option<String> {
    tag.attributes()
        .get(name)
        .flatten()
        .map(|value| value.as_utf8_str().into_owned())
}

fn has_canonical(head: &HTMLTag<'_>, parser: &Parser<'_>) -> bool {
    tags(head, parser, "link").any(|link| attr(link, "rel").as_deref() == Some("canonical"))
}

fn has_robots(head: &HTMLTag<'_>, parser: &Parser<'_>, content: &str) -> bool {
    tags(head, parser, "meta").any(|meta| {
        attr(meta, "name").as_deref() == Some("robots")
            && attr(meta, "content").as_deref() == Some(content)
    })
}

/// Byte range of a tag's content: after its opening tag, up to `closing`.
///
/// Offsets come from the tag's source slice, which borrows from `html`.
/// Without a closing tag the range ends where the parser ended the tag.
fn inner_span(html: &str, lower: &str, tag: &HTMLTag<'_>, closing: &str) -> Option<(usize, usize)> {
    let raw = tag.raw().as_bytes();
    let start = (raw.as_ptr() as usize).checked_sub(html.as_ptr() as usize)?;
    let end = start + raw.len();
    if end > html.len() {
        return None;
    }

    let open_end = start + html[start..end].find('>')? + 1;
    let close = lower[open_end..]
        .find(closing)
        .map_or(end, |offset| open_end + offset);

    html.is_char_boundary(close).then_some((open_end, close.max(open_end)))
}

/// Join URL path segments, dropping empty and `.` segments.
fn join_url_path(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in parts.iter().flat_map(|part| part.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Longest prefix of `s` at most `max` bytes long, on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn upgrade_https(html: &str) -> String {
    html.replace(r#"src="http://"#, r#"src="https://"#)
        .replace(r#"href="http://"#, r#"href="https://"#)
}
