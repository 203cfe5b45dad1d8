//! Configuration section definitions.
//!
//! Each module corresponds to a section in `docseo.toml`:
//!
//! | Module      | TOML Section  | Purpose                               |
//! |-------------|---------------|---------------------------------------|
//! | `site`      | `[site]`      | Root URL and product name             |
//! | `transform` | `[transform]` | Page rewriting (robots, title length) |
//! | `sitemap`   | `[sitemap]`   | Sitemap file name, history window     |
//! | `git`       | `[git]`       | Commit identity and push target       |

mod git;
mod site;
mod sitemap;
mod transform;

pub use git::GitConfig;
pub use site::SiteSectionConfig;
pub use sitemap::SitemapConfig;
pub use transform::TransformConfig;
