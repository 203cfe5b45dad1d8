//! Git operations for the sitemap command.
//!
//! Reads recent history for the change extractor and commits/pushes the
//! regenerated sitemap files.

mod commit;
mod repo;

pub use commit::{CommitOutcome, GitIdentity, commit_files};
pub use repo::{discover_root, log_since};
