use thiserror::Error;

/// Failures of the sitemap engine. All of them abort the run.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to walk documentation tree")]
    Walk(#[from] jwalk::Error),

    #[error("malformed sitemap XML")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed sitemap XML: {0}")]
    Malformed(String),

    #[error("expected <urlset> root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("sitemap has no <urlset> root element")]
    MissingRoot,

    #[error("unknown changefreq `{0}`")]
    InvalidChangeFreq(String),

    #[error("invalid priority `{0}`")]
    InvalidPriority(String),

    #[error("history line {line}: invalid timestamp `{value}`: {reason}")]
    Timestamp {
        line: usize,
        value: String,
        reason: String,
    },
}
