//! Glob-based file sets.
//!
//! Entry and keep files are given as glob patterns relative to a base
//! directory:
//!
//! ```toml
//! files = ["css/*.css", "themes/**/site.css"]
//! keep = ["css/print.css"]
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileSetError {
    #[error("invalid glob pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A list of glob patterns resolved against a base directory.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    base: PathBuf,
    patterns: Vec<String>,
}

impl FileSet {
    pub fn new(base: impl Into<PathBuf>, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            base: base.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Full pattern for `pattern`: absolute patterns are used as-is,
    /// relative ones are joined onto the (escaped) base directory.
    fn full_pattern(&self, pattern: &str) -> String {
        if Path::new(pattern).is_absolute() || self.base.as_os_str().is_empty() {
            return pattern.to_string();
        }
        let base = glob::Pattern::escape(&self.base.to_string_lossy());
        format!("{}/{}", base.trim_end_matches('/'), pattern)
    }

    /// Expand all patterns to existing files.
    ///
    /// Files keep pattern order (alphabetical within one pattern) and appear
    /// once even if several patterns match them. Directories are skipped.
    pub fn resolve(&self) -> Result<Vec<PathBuf>, FileSetError> {
        let mut files: Vec<PathBuf> = Vec::new();
        for pattern in &self.patterns {
            let full = self.full_pattern(pattern);
            let paths = glob::glob(&full).map_err(|source| FileSetError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in paths {
                let path = entry.map_err(|e| FileSetError::Read {
                    path: e.path().to_path_buf(),
                    source: e.into(),
                })?;
                if path.is_file() && !files.contains(&path) {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }

    /// Patterns that currently match no file.
    pub fn unmatched(&self) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|pattern| {
                glob::glob(&self.full_pattern(pattern))
                    .map(|mut paths| !paths.any(|p| p.is_ok_and(|p| p.is_file())))
                    .unwrap_or(false)
            })
            .map(String::as_str)
            .collect()
    }
}
