//! Command-line interface definitions.

use clap::builder::FalseyValueParser;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// SEO post-processing for versioned documentation sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docseo.toml, if present)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print debug output, including the git commands being run
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--verbose`, or `--debug` on the sitemap command.
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(&self.command, Commands::Sitemap { args } if args.debug)
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add canonical links, robots meta and title suffixes to versioned pages
    #[command(visible_alias = "t")]
    Transform {
        #[command(flatten)]
        args: TransformArgs,
    },

    /// Build or update the merged sitemap, then commit and push it
    #[command(visible_alias = "s")]
    Sitemap {
        #[command(flatten)]
        args: SitemapArgs,
    },
}

/// Transform command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TransformArgs {
    /// Documentation tree of one product, e.g. `site/traefik`
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub path: PathBuf,

    /// Product name (default: last component of --path)
    #[arg(long)]
    pub product: Option<String>,

    /// Override the site root URL used for canonical links
    #[arg(long)]
    pub site_url: Option<String>,
}

/// Sitemap command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SitemapArgs {
    /// Documentation root holding sitemap.xml
    #[arg(long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Debug mode
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Git user name for the sitemap commit
    #[arg(long, env = "GIT_USER_NAME")]
    pub git_user_name: Option<String>,

    /// Git user email for the sitemap commit
    #[arg(long, env = "GIT_USER_EMAIL")]
    pub git_user_email: Option<String>,

    /// GitHub token used to push
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Write the sitemap files without committing them
    #[arg(long)]
    pub skip_commit: bool,

    /// Override the site root URL used for sitemap locations
    #[arg(long)]
    pub site_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_transform() {
        let cli = Cli::try_parse_from(["docseo", "t", "-p", "site/traefik", "--product", "traefik"])
            .unwrap();
        let Commands::Transform { args } = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.path, PathBuf::from("site/traefik"));
        assert_eq!(args.product.as_deref(), Some("traefik"));
    }

    #[test]
    fn test_transform_requires_path() {
        assert!(Cli::try_parse_from(["docseo", "transform"]).is_err());
    }

    #[test]
    fn test_parse_sitemap() {
        let cli = Cli::try_parse_from([
            "docseo",
            "--verbose",
            "sitemap",
            "--root",
            "site",
            "--token",
            "secret",
            "--skip-commit",
        ])
        .unwrap();

        assert!(cli.is_verbose());
        let Commands::Sitemap { args } = cli.command else {
            panic!("expected sitemap");
        };
        assert_eq!(args.root, PathBuf::from("site"));
        assert_eq!(args.token.as_deref(), Some("secret"));
        assert!(args.skip_commit);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["docseo", "s", "-C", "custom.toml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
