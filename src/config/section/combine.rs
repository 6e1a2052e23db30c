//! `[combine]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [combine]
//! working_dir = "wwwroot"     # Base for `/`-rooted imports and globs (relative to config dir)
//! files = ["css/*.css"]       # Entry stylesheets, combined in place
//! keep = ["css/print.css"]    # Inlined files that must not be deleted
//! version = "1.4.0.2817"      # Build version; urls get `?v=2817`
//! verbose = false
//! parallel = false            # Combine entry files in parallel
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::FileSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineSectionConfig {
    /// Website base path.
    pub working_dir: PathBuf,
    /// Glob patterns of entry stylesheets, relative to `working_dir`.
    pub files: Vec<String>,
    /// Glob patterns of inlined files to keep, relative to `working_dir`.
    pub keep: Vec<String>,
    /// Raw build version. Without it, urls are left unversioned.
    pub version: Option<String>,
    /// Log every scan, load and import step.
    pub verbose: bool,
    /// Combine entry files on a thread pool.
    pub parallel: bool,
}

impl Default for CombineSectionConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            files: Vec::new(),
            keep: Vec::new(),
            version: None,
            verbose: false,
            parallel: false,
        }
    }
}

impl CombineSectionConfig {
    pub const FIELD_WORKING_DIR: FieldPath = FieldPath::new("combine.working_dir");
    pub const FIELD_FILES: FieldPath = FieldPath::new("combine.files");
    pub const FIELD_KEEP: FieldPath = FieldPath::new("combine.keep");
    pub const FIELD_VERSION: FieldPath = FieldPath::new("combine.version");

    /// Entry file set.
    pub fn entry_set(&self) -> FileSet {
        FileSet::new(&self.working_dir, self.files.iter().cloned())
    }

    /// Keep file set.
    pub fn keep_set(&self) -> FileSet {
        FileSet::new(&self.working_dir, self.keep.iter().cloned())
    }

    /// Validate the section (expects `working_dir` already normalized).
    ///
    /// # Checks
    /// - `working_dir` must exist and be a directory
    /// - `files` must not be empty, and every pattern should match a file
    /// - `keep` patterns should match a file (warning only)
    /// - `version`, when set, must not be blank
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.working_dir.exists() {
            diag.error_with_hint(
                Self::FIELD_WORKING_DIR,
                format!("directory not found: {}", self.working_dir.display()),
                flag_hint(Self::FIELD_WORKING_DIR),
            );
            return;
        }
        if !self.working_dir.is_dir() {
            diag.error(
                Self::FIELD_WORKING_DIR,
                format!("not a directory: {}", self.working_dir.display()),
            );
            return;
        }

        if self.files.is_empty() {
            diag.error_with_hint(
                Self::FIELD_FILES,
                "no entry files configured",
                format!("add a glob such as \"css/*.css\" or {}", flag_hint(Self::FIELD_FILES)),
            );
        } else {
            for pattern in self.entry_set().unmatched() {
                diag.warn(Self::FIELD_FILES, format!("`{pattern}` matched no files"));
            }
        }

        for pattern in self.keep_set().unmatched() {
            diag.warn(Self::FIELD_KEEP, format!("`{pattern}` matched no files"));
        }

        if self.version.as_deref().is_some_and(|v| v.trim().is_empty()) {
            diag.error_with_hint(
                Self::FIELD_VERSION,
                "version is empty",
                "remove the field to skip url versioning",
            );
        }
    }
}

fn flag_hint(field: FieldPath) -> String {
    format!("pass --{}", field.key().replace('_', "-"))
}
