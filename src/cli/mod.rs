//! Command-line interface module.

mod args;
pub mod sitemap;
pub mod transform;

pub use args::{Cli, Commands, SitemapArgs, TransformArgs};
