//! Configuration management for `csscombine.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [combine]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util           # config file lookup
//! └── mod.rs         # CombineConfig (this file)
//! ```
//!
//! Values come from the config file first, then command-line flags override
//! them. Paths in the file are relative to the file's directory; paths given
//! on the command line are relative to the current directory.

pub mod section;
pub mod types;
mod util;

pub use section::CombineSectionConfig;
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, Severity};
pub use util::find_config_file;

use crate::cli::CombineArgs;
use crate::combine::CombineOptions;
use crate::utils::path::{FileSetError, normalize_path};
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the current directory.
pub const DEFAULT_CONFIG: &str = "csscombine.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing csscombine.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombineConfig {
    /// Absolute path to the config file, empty if none was found (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths in the file resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Combine settings
    #[serde(default)]
    pub combine: CombineSectionConfig,
}

impl CombineConfig {
    /// Load configuration for the `combine` command.
    ///
    /// Searches upward from cwd for `config_name`. A missing default config
    /// is fine when the command line supplies everything; a missing explicit
    /// config is an error.
    pub fn load(config_name: &Path, args: &CombineArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(config_name, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None if config_name != Path::new(DEFAULT_CONFIG) => {
                bail!(ConfigError::Io(
                    config_name.to_path_buf(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                ));
            }
            None => {
                debug!("config"; "no {} found, using command line options", DEFAULT_CONFIG);
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.finalize(&cwd, args);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply command-line overrides and normalize paths.
    fn finalize(&mut self, cwd: &Path, args: &CombineArgs) {
        let section = &mut self.combine;

        section.working_dir = match &args.working_dir {
            Some(dir) => normalize_path(&cwd.join(dir)),
            None => normalize_path(&self.root.join(&section.working_dir)),
        };

        if !args.files.is_empty() {
            section.files = args.files.clone();
        }
        if !args.keep.is_empty() {
            section.keep = args.keep.clone();
        }
        if let Some(version) = &args.version {
            section.version = Some(version.clone());
        }
        Self::update_option(&mut section.parallel, args.parallel.as_ref());
        section.verbose |= args.verbose;

        crate::logger::set_verbose(section.verbose);
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.combine.validate(&mut diag);
        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Resolve file sets into pipeline options.
    pub fn to_options(&self) -> Result<CombineOptions, FileSetError> {
        let section = &self.combine;
        Ok(CombineOptions {
            entry_files: section.entry_set().resolve()?,
            working_dir: section.working_dir.clone(),
            keep_files: section.keep_set().resolve()?,
            raw_version: section.version.clone(),
            verbose: section.verbose,
            parallel: section.parallel,
        })
    }
}

/// Commented template written by `csscombine init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"[combine]
# Website base path; `/`-rooted imports and the globs below resolve against it.
working_dir = "."

# Entry stylesheets. Each one is rewritten in place with its imports inlined.
files = ["css/*.css"]

# Inlined files that must survive the clean-up.
keep = []

# Build version. Only the last component is used: "1.0.0.1" -> `?v=1`.
# Remove to leave url() references untouched.
version = "1.0.0.1"

verbose = false
parallel = false
"#;

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking if there are unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> CombineConfig {
    let (parsed, ignored) = CombineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
