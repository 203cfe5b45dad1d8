//! Utility modules shared by the transform and sitemap commands.

pub mod date;
pub mod exec;
pub mod git;
pub mod html;
pub mod plural;
