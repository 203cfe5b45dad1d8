//! Change extraction from `git log --name-status` output.
//!
//! The log is read oldest commit first:
//!
//! ```text
//! 3f2c1ab 2023-06-01T09:12:44
//! M       traefik/routing/overview/index.html
//! R087    traefik/old/index.html  traefik/new/index.html
//! ```
//!
//! Header lines update the current timestamp. Status lines for pages
//! (`.../index.html`) become events keyed by absolute URL; a later line for
//! the same URL replaces the earlier one.

use super::{SitemapError, UrlEntry, is_versioned};
use crate::utils::date::DateTimeUtc;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::io::BufRead;
use std::sync::LazyLock;

/// `<short hash> <timestamp>`
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s]+\s+(\d{4}-\d{2}-\d{2}T\d{1,2}:\d{1,2}:\d{1,2})$")
        .expect("valid header pattern")
});

/// `<M|A|D|U> <dir>/index.html`
static STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([MADU])\s+([a-z][^/]+.+/)index\.html$").expect("valid status pattern")
});

/// `<C|R><score> <old dir>/index.html <new dir>/index.html`
static RENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([CR])\d+\s+([a-z][^/]+.+/)index\.html\s+([a-z][^/]+.+/)index\.html$")
        .expect("valid rename pattern")
});

const PAGE_SUFFIX: &str = "index.html";

/// Change events keyed by absolute URL.
pub type ChangeSet = FxHashMap<String, ChangeEvent>;

/// Status letter of a name-status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Add,
    Modify,
    Delete,
    /// Unmerged, or a letter with no dedicated meaning.
    Unknown,
}

impl ChangeStatus {
    fn from_letter(letter: &str) -> Self {
        match letter {
            "A" => Self::Add,
            "M" => Self::Modify,
            "D" => Self::Delete,
            _ => Self::Unknown,
        }
    }

    pub fn is_delete(self) -> bool {
        self == Self::Delete
    }
}

/// One page change taken from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub status: ChangeStatus,
    /// Site-relative directory with a trailing slash, e.g. `traefik/routing/`.
    pub path: String,
    pub timestamp: DateTimeUtc,
}

impl ChangeEvent {
    /// Sitemap entry describing the changed page.
    pub fn to_entry(&self, base_url: &str) -> UrlEntry {
        UrlEntry::daily(format!("{base_url}{}", self.path), self.timestamp.to_date())
    }
}

/// Read change events from name-status history.
///
/// Unrecognized lines are skipped. A header whose timestamp matches the
/// pattern but is not a real date is an error.
pub fn extract_changes<R: BufRead>(history: R, base_url: &str) -> Result<ChangeSet, SitemapError> {
    let mut changes = ChangeSet::default();
    let mut timestamp = DateTimeUtc::MIN;

    for (index, line) in history.split(b'\n').enumerate() {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = HEADER.captures(line) {
            let value = &caps[1];
            timestamp = DateTimeUtc::parse_git_timestamp(value).map_err(|err| {
                SitemapError::Timestamp {
                    line: index + 1,
                    value: value.to_string(),
                    reason: err.to_string(),
                }
            })?;
        }

        if !line.ends_with(PAGE_SUFFIX) {
            continue;
        }

        if let Some(caps) = RENAME.captures(line) {
            // Old and new side are filtered separately, so a move across
            // the version boundary becomes a lone delete or a lone add.
            for (status, path) in [(ChangeStatus::Delete, &caps[2]), (ChangeStatus::Add, &caps[3])] {
                if !is_versioned(path) {
                    record(&mut changes, base_url, status, path, timestamp);
                }
            }
        } else if let Some(caps) = STATUS.captures(line) {
            let path = &caps[2];
            if !is_versioned(path) {
                record(&mut changes, base_url, ChangeStatus::from_letter(&caps[1]), path, timestamp);
            }
        }
    }

    Ok(changes)
}

fn record(changes: &mut ChangeSet, base_url: &str, status: ChangeStatus, path: &str, timestamp: DateTimeUtc) {
    changes.insert(
        format!("{base_url}{path}"),
        ChangeEvent {
            status,
            path: path.to_string(),
            timestamp,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://doc.traefik.io/";

    fn extract(log: &str) -> ChangeSet {
        extract_changes(log.as_bytes(), BASE).unwrap()
    }

    fn event(changes: &ChangeSet, path: &str) -> ChangeEvent {
        changes[&format!("{BASE}{path}")].clone()
    }

    #[test]
    fn test_extract_status_lines() {
        let log = "\
a1b2c3d 2023-06-01T09:12:44
M\ttraefik/routing/overview/index.html
A\ttraefik/plugins/index.html
D\tmesh/old/index.html
M\ttraefik/assets/style.css
";
        let changes = extract(log);
        assert_eq!(changes.len(), 3);

        let modified = event(&changes, "traefik/routing/overview/");
        assert_eq!(modified.status, ChangeStatus::Modify);
        assert_eq!(modified.timestamp, DateTimeUtc::new(2023, 6, 1, 9, 12, 44));
        assert_eq!(event(&changes, "traefik/plugins/").status, ChangeStatus::Add);
        assert_eq!(event(&changes, "mesh/old/").status, ChangeStatus::Delete);
    }

    #[test]
    fn test_last_event_wins() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
M\ttraefik/routing/index.html

e4f5a6b 2023-06-02T10:00:00
D\ttraefik/routing/index.html
";
        let changes = extract(log);
        assert_eq!(changes.len(), 1);

        let last = event(&changes, "traefik/routing/");
        assert_eq!(last.status, ChangeStatus::Delete);
        assert_eq!(last.timestamp.to_date(), "2023-06-02");
    }

    #[test]
    fn test_versioned_paths_skipped() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
M\ttraefik/v2.10/routing/index.html
A\ttraefik/master/index.html
M\ttraefik/routing/index.html
";
        let changes = extract(log);
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("https://doc.traefik.io/traefik/routing/"));
    }

    #[test]
    fn test_rename_to_versioned_path() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
R100\told/index.html\ttraefik/v2.10/new/index.html
";
        let changes = extract(log);
        assert_eq!(changes.len(), 1);
        assert_eq!(event(&changes, "old/").status, ChangeStatus::Delete);
    }

    #[test]
    fn test_rename_between_unversioned_paths() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
R087\ttraefik/old/index.html\ttraefik/new/index.html
C100\ttraefik/a/index.html\ttraefik/b/index.html
";
        let changes = extract(log);
        assert_eq!(event(&changes, "traefik/old/").status, ChangeStatus::Delete);
        assert_eq!(event(&changes, "traefik/new/").status, ChangeStatus::Add);
        // Copies are treated like renames.
        assert_eq!(event(&changes, "traefik/a/").status, ChangeStatus::Delete);
        assert_eq!(event(&changes, "traefik/b/").status, ChangeStatus::Add);
    }

    #[test]
    fn test_rename_from_versioned_path() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
R100\ttraefik/v1.7/new/index.html\ttraefik/new/index.html
";
        let changes = extract(log);
        assert_eq!(changes.len(), 1);
        assert_eq!(event(&changes, "traefik/new/").status, ChangeStatus::Add);
    }

    #[test]
    fn test_unmerged_status() {
        let changes = extract("U\ttraefik/conflict/index.html\n");
        let conflict = event(&changes, "traefik/conflict/");
        assert_eq!(conflict.status, ChangeStatus::Unknown);
        // No header seen yet.
        assert_eq!(conflict.timestamp, DateTimeUtc::MIN);
    }

    #[test]
    fn test_root_and_uppercase_pages_skipped() {
        let log = "\
a1b2c3d 2023-06-01T09:00:00
M\tindex.html
M\tTraefik/index.html
X\ttraefik/index.html
";
        assert!(extract(log).is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let log = "a1b2c3d 2023-06-01T09:00:00\r\nM\ttraefik/routing/index.html\r\n";
        let changes = extract(log);
        assert_eq!(event(&changes, "traefik/routing/").timestamp.to_date(), "2023-06-01");
    }

    #[test]
    fn test_single_digit_hour() {
        let changes = extract("a1b2c3d 2023-06-01T9:05:07\nA\ttraefik/index.html\n");
        assert_eq!(
            event(&changes, "traefik/").timestamp,
            DateTimeUtc::new(2023, 6, 1, 9, 5, 7)
        );
    }

    #[test]
    fn test_invalid_timestamp_is_fatal() {
        let log = "a1b2c3d 2023-06-01T09:00:00\nM\ttraefik/index.html\ne4f5a6b 2023-13-45T09:00:00\n";
        let err = extract_changes(log.as_bytes(), BASE).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::Timestamp { line: 3, ref value, .. } if value == "2023-13-45T09:00:00"
        ));
    }

    #[test]
    fn test_event_to_entry() {
        let event = ChangeEvent {
            status: ChangeStatus::Modify,
            path: "a/".to_string(),
            timestamp: DateTimeUtc::new(2023, 6, 1, 0, 0, 0),
        };
        let entry = event.to_entry(BASE);
        assert_eq!(entry, UrlEntry::daily("https://doc.traefik.io/a/", "2023-06-01"));
    }
}
