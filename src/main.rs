//! csscombine - combine stylesheets for deployment.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use csscombine::cli::{self, Cli, Commands};
use csscombine::combine::derive_version_token;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Combine { args } => cli::combine::run_combine(&cli.config, args),
        Commands::Init { dir, dry } => {
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            cli::init::write_default_config(&dir, *dry)
        }
        Commands::Token { version } => {
            println!("{}", derive_version_token(version));
            Ok(())
        }
    }
}
