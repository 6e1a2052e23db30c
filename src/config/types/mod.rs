//! Configuration utility types.
//!
//! | Item        | Purpose                                  |
//! |-------------|------------------------------------------|
//! | `error`     | `ConfigError` and collected diagnostics  |
//! | `FieldPath` | Dotted field name addressing diagnostics |

mod error;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, Severity};

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `combine.working_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Last segment, which is also the CLI flag stem (`working_dir`).
    pub fn key(&self) -> &'static str {
        self.0.rsplit('.').next().unwrap_or(self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_key() {
        assert_eq!(FieldPath::new("combine.working_dir").key(), "working_dir");
        assert_eq!(FieldPath::new("combine").key(), "combine");
    }
}
