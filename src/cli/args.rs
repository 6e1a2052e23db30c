//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Inline css @import directives and cache-bust url() references
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: csscombine.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = crate::config::DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Combine entry stylesheets in place and delete inlined files
    #[command(visible_alias = "c")]
    Combine {
        #[command(flatten)]
        args: CombineArgs,
    },

    /// Write a default csscombine.toml
    #[command(visible_alias = "i")]
    Init {
        /// Directory to write the config into (default: current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Print the template instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Print the version token derived from a build version
    #[command(visible_alias = "t")]
    Token {
        /// Build version, e.g. 1.4.0.2817
        version: String,
    },
}

/// Arguments for the combine command. Each one overrides csscombine.toml.
#[derive(clap::Args, Debug, Clone)]
pub struct CombineArgs {
    /// Website base path (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub working_dir: Option<PathBuf>,

    /// Entry stylesheet glob, relative to the working dir (repeatable)
    #[arg(short, long = "files", value_name = "GLOB")]
    pub files: Vec<String>,

    /// Glob of inlined files never to delete (repeatable)
    #[arg(short, long = "keep", value_name = "GLOB")]
    pub keep: Vec<String>,

    /// Build version; url() references get `?v=<last component>`
    #[arg(short = 'a', long = "assembly-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Combine entry files in parallel
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub parallel: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_combine_args() {
        let cli = Cli::try_parse_from([
            "csscombine",
            "combine",
            "-w",
            "wwwroot",
            "-f",
            "css/*.css",
            "--files",
            "themes/*.css",
            "--keep",
            "css/print.css",
            "--assembly-version",
            "1.4.0.2817",
            "--parallel",
            "-V",
        ])
        .unwrap();

        let Commands::Combine { args } = cli.command else {
            panic!("expected combine");
        };
        assert_eq!(args.working_dir, Some(PathBuf::from("wwwroot")));
        assert_eq!(args.files, vec!["css/*.css", "themes/*.css"]);
        assert_eq!(args.keep, vec!["css/print.css"]);
        assert_eq!(args.version.as_deref(), Some("1.4.0.2817"));
        assert_eq!(args.parallel, Some(true));
        assert!(args.verbose);
        assert_eq!(cli.config, PathBuf::from("csscombine.toml"));
    }

    #[test]
    fn test_parse_token() {
        let cli = Cli::try_parse_from(["csscombine", "t", "9.1.0.42"]).unwrap();
        assert!(matches!(cli.command, Commands::Token { ref version } if version == "9.1.0.42"));
    }
}
