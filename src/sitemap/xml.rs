//! `<urlset>` reading and writing with quick-xml.
//!
//! Output shape, two-space indent, leaves inline:
//!
//! ```xml
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://doc.traefik.io/traefik/</loc>
//!     <lastmod>2023-06-01</lastmod>
//!     <changefreq>daily</changefreq>
//!   </url>
//! </urlset>
//! ```

use super::{SitemapError, UrlEntry, UrlSet};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};

/// Declaration line written before the document.
pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// ============================================================================
// Writing
// ============================================================================

impl UrlSet {
    /// Write the document without declaration or trailing newline.
    pub fn write_to<W: Write>(&self, out: W) -> Result<(), SitemapError> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);

        let root = BytesStart::new("urlset").with_attributes([("xmlns", self.xmlns.as_str())]);
        writer.write_event(Event::Start(root))?;

        for url in &self.urls {
            writer.write_event(Event::Start(BytesStart::new("url")))?;
            write_leaf(&mut writer, "loc", &url.loc)?;
            write_leaf(&mut writer, "lastmod", &url.lastmod)?;
            if let Some(freq) = url.changefreq {
                write_leaf(&mut writer, "changefreq", freq.as_str())?;
            }
            if let Some(priority) = url.priority.filter(|&p| p != 0) {
                write_leaf(&mut writer, "priority", &priority.to_string())?;
            }
            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;
        Ok(())
    }

    /// Full file content: declaration, document, trailing newline.
    #[cfg(test)]
    pub fn to_document(&self) -> Result<Vec<u8>, SitemapError> {
        let mut out = Vec::new();
        write_document(&mut out, self)?;
        Ok(out)
    }
}

/// Write declaration, document and trailing newline to `out`.
pub fn write_document<W: Write>(out: &mut W, set: &UrlSet) -> Result<(), SitemapError> {
    out.write_all(XML_DECL.as_bytes())?;
    out.write_all(b"\n")?;
    set.write_to(&mut *out)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn write_leaf<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), SitemapError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

// ============================================================================
// Reading
// ============================================================================

/// Child element of `<url>` whose text is being collected.
#[derive(Debug, Clone, Copy)]
enum Field {
    Loc,
    LastMod,
    ChangeFreq,
    Priority,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"loc" => Some(Self::Loc),
            b"lastmod" => Some(Self::LastMod),
            b"changefreq" => Some(Self::ChangeFreq),
            b"priority" => Some(Self::Priority),
            _ => None,
        }
    }

    fn assign(self, entry: &mut UrlEntry, text: &str) -> Result<(), SitemapError> {
        match self {
            Self::Loc => entry.loc = text.to_string(),
            Self::LastMod => entry.lastmod = text.to_string(),
            Self::ChangeFreq if text.is_empty() => entry.changefreq = None,
            Self::ChangeFreq => entry.changefreq = Some(text.parse()?),
            Self::Priority => entry.priority = parse_priority(text)?,
        }
        Ok(())
    }
}

/// Zero and empty both mean "no priority".
fn parse_priority(text: &str) -> Result<Option<u32>, SitemapError> {
    if text.is_empty() {
        return Ok(None);
    }
    let value: u32 = text
        .parse()
        .map_err(|_| SitemapError::InvalidPriority(text.to_string()))?;
    Ok((value != 0).then_some(value))
}

fn malformed(err: impl std::fmt::Display) -> SitemapError {
    SitemapError::Malformed(err.to_string())
}

fn empty_entry() -> UrlEntry {
    UrlEntry {
        loc: String::new(),
        lastmod: String::new(),
        changefreq: None,
        priority: None,
    }
}

impl UrlSet {
    /// Parse a sitemap document.
    ///
    /// Only direct children of `<url>` are bound; unknown children are
    /// skipped with their whole subtree. Text of known leaves is trimmed.
    pub fn read<R: BufRead>(input: R) -> Result<Self, SitemapError> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();

        let mut set: Option<UrlSet> = None;
        let mut entry: Option<UrlEntry> = None;
        // Open elements below the current `<url>`.
        let mut depth = 0usize;
        let mut field: Option<Field> = None;
        let mut text = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = e.local_name();
                    if set.is_none() {
                        set = Some(start_urlset(&e, name.as_ref())?);
                    } else if entry.is_some() {
                        depth += 1;
                        if depth == 1 {
                            field = Field::from_name(name.as_ref());
                            text.clear();
                        }
                    } else if name.as_ref() == b"url" {
                        entry = Some(empty_entry());
                        depth = 0;
                    }
                }
                Event::Empty(e) => {
                    let name = e.local_name();
                    if set.is_none() {
                        set = Some(start_urlset(&e, name.as_ref())?);
                    } else if let Some(entry) = entry.as_mut() {
                        if depth == 0
                            && let Some(f) = Field::from_name(name.as_ref())
                        {
                            f.assign(entry, "")?;
                        }
                    } else if name.as_ref() == b"url"
                        && let Some(set) = set.as_mut()
                    {
                        set.urls.push(empty_entry());
                    }
                }
                Event::Text(e) if depth == 1 && field.is_some() => {
                    let raw = std::str::from_utf8(&e).map_err(malformed)?;
                    text.push_str(&quick_xml::escape::unescape(raw).map_err(malformed)?);
                }
                Event::CData(e) if depth == 1 && field.is_some() => {
                    text.push_str(std::str::from_utf8(&e).map_err(malformed)?);
                }
                Event::GeneralRef(e) if depth == 1 && field.is_some() => {
                    let name = std::str::from_utf8(&e).map_err(malformed)?;
                    let reference = format!("&{name};");
                    text.push_str(&quick_xml::escape::unescape(&reference).map_err(malformed)?);
                }
                Event::End(_) => {
                    if depth == 0 {
                        if let (Some(set), Some(done)) = (set.as_mut(), entry.take()) {
                            set.urls.push(done);
                        }
                    } else {
                        if depth == 1
                            && let (Some(entry), Some(f)) = (entry.as_mut(), field.take())
                        {
                            f.assign(entry, text.trim())?;
                        }
                        depth -= 1;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        set.ok_or(SitemapError::MissingRoot)
    }
}

fn start_urlset(e: &BytesStart<'_>, name: &[u8]) -> Result<UrlSet, SitemapError> {
    if name != b"urlset" {
        return Err(SitemapError::UnexpectedRoot(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }

    let mut set = UrlSet::new(Vec::new());
    set.xmlns.clear();
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref() == b"xmlns" {
            let raw = std::str::from_utf8(&attr.value).map_err(malformed)?;
            set.xmlns = quick_xml::escape::unescape(raw).map_err(malformed)?.into_owned();
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::{ChangeFreq, SITEMAP_NS};

    fn entry(loc: &str, lastmod: &str, priority: Option<u32>) -> UrlEntry {
        UrlEntry {
            priority,
            ..UrlEntry::daily(loc, lastmod)
        }
    }

    fn reparse(set: &UrlSet) -> UrlSet {
        UrlSet::read(set.to_document().unwrap().as_slice()).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let set = UrlSet::new(vec![UrlEntry::daily(
            "https://doc.traefik.io/traefik/",
            "2023-06-01",
        )]);
        let doc = String::from_utf8(set.to_document().unwrap()).unwrap();

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
            "  <url>\n",
            "    <loc>https://doc.traefik.io/traefik/</loc>\n",
            "    <lastmod>2023-06-01</lastmod>\n",
            "    <changefreq>daily</changefreq>\n",
            "  </url>\n",
            "</urlset>\n",
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_priority_written_only_when_nonzero() {
        let set = UrlSet::new(vec![
            entry("https://doc.traefik.io/a/", "2023-06-01", Some(0)),
            entry("https://doc.traefik.io/b/", "2023-06-01", Some(5)),
        ]);
        let doc = String::from_utf8(set.to_document().unwrap()).unwrap();

        assert_eq!(doc.matches("<priority>").count(), 1);
        assert!(doc.contains("<priority>5</priority>"));
    }

    #[test]
    fn test_round_trip_empty() {
        let set = UrlSet::default();
        assert_eq!(reparse(&set), set);
    }

    #[test]
    fn test_round_trip_single() {
        let set = UrlSet::new(vec![UrlEntry::daily("https://doc.traefik.io/a/", "2023-01-01")]);
        assert_eq!(reparse(&set), set);
    }

    #[test]
    fn test_round_trip_many_with_priority() {
        let set = UrlSet::new(vec![
            entry("https://doc.traefik.io/a/", "2023-01-01", None),
            entry("https://doc.traefik.io/b/?q=1&r=2", "2023-01-02", Some(3)),
            UrlEntry {
                changefreq: None,
                ..entry("https://doc.traefik.io/c/", "", None)
            },
        ]);
        assert_eq!(reparse(&set), set);
    }

    #[test]
    fn test_zero_priority_reads_as_absent() {
        let doc = format!(
            r#"<urlset xmlns="{SITEMAP_NS}"><url><loc>https://doc.traefik.io/a/</loc><lastmod>2023-01-01</lastmod><priority>0</priority></url></urlset>"#
        );
        let set = UrlSet::read(doc.as_bytes()).unwrap();
        assert_eq!(set.urls[0].priority, None);
        assert_eq!(set.urls[0].changefreq, None);
    }

    #[test]
    fn test_read_escaped_location() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc> https://doc.traefik.io/a/?x=1&amp;y=2 </loc>
    <lastmod>2023-01-01</lastmod>
    <changefreq>weekly</changefreq>
  </url>
</urlset>
"#;
        let set = UrlSet::read(doc.as_bytes()).unwrap();
        assert_eq!(set.xmlns, SITEMAP_NS);
        assert_eq!(set.urls.len(), 1);
        assert_eq!(set.urls[0].loc, "https://doc.traefik.io/a/?x=1&y=2");
        assert_eq!(set.urls[0].changefreq, Some(ChangeFreq::Weekly));
    }

    #[test]
    fn test_read_skips_unknown_elements() {
        let doc = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://doc.traefik.io/a/</loc><image>x</image><lastmod>2023-01-01</lastmod></url></urlset>"#;
        let set = UrlSet::read(doc.as_bytes()).unwrap();
        assert_eq!(set.urls[0].loc, "https://doc.traefik.io/a/");
        assert_eq!(set.urls[0].lastmod, "2023-01-01");
    }

    #[test]
    fn test_read_ignores_nested_image_location() {
        let doc = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://doc.traefik.io/a/</loc>
    <image:image>
      <image:loc>https://doc.traefik.io/a/logo.png</image:loc>
      <image:title>Logo</image:title>
    </image:image>
    <lastmod>2023-01-01</lastmod>
  </url>
  <url>
    <image:image><image:loc>https://doc.traefik.io/b/logo.png</image:loc></image:image>
    <loc>https://doc.traefik.io/b/</loc>
    <changefreq>daily</changefreq>
  </url>
</urlset>"#;
        let set = UrlSet::read(doc.as_bytes()).unwrap();

        assert_eq!(set.urls.len(), 2);
        assert_eq!(set.urls[0].loc, "https://doc.traefik.io/a/");
        assert_eq!(set.urls[0].lastmod, "2023-01-01");
        assert_eq!(set.urls[1].loc, "https://doc.traefik.io/b/");
        assert_eq!(set.urls[1].changefreq, Some(ChangeFreq::Daily));
    }

    #[test]
    fn test_read_skips_nested_known_names() {
        let doc = r#"<urlset><url><loc>https://doc.traefik.io/a/</loc><extra><lastmod>1999-01-01</lastmod><priority>x</priority></extra><lastmod>2023-01-01</lastmod></url></urlset>"#;
        let set = UrlSet::read(doc.as_bytes()).unwrap();

        assert_eq!(set.urls[0].lastmod, "2023-01-01");
        assert_eq!(set.urls[0].priority, None);
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(
            UrlSet::read(&b"<sitemapindex></sitemapindex>"[..]),
            Err(SitemapError::UnexpectedRoot(name)) if name == "sitemapindex"
        ));
        assert!(matches!(
            UrlSet::read(&b""[..]),
            Err(SitemapError::MissingRoot)
        ));
        assert!(matches!(
            UrlSet::read(&b"<urlset><url><changefreq>sometimes</changefreq></url></urlset>"[..]),
            Err(SitemapError::InvalidChangeFreq(_))
        ));
        assert!(matches!(
            UrlSet::read(&b"<urlset><url><priority>high</priority></url></urlset>"[..]),
            Err(SitemapError::InvalidPriority(_))
        ));
        assert!(matches!(
            UrlSet::read(&b"<urlset><url><loc>&bogus;</loc></url></urlset>"[..]),
            Err(SitemapError::Malformed(_))
        ));
        assert!(matches!(
            UrlSet::read(&b"<urlset><url></urlset>"[..]),
            Err(SitemapError::Xml(_))
        ));
    }
}
