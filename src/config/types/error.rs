//! Errors from loading `csscombine.toml`.
//!
//! Validation does not stop at the first problem: every check of the
//! `[combine]` section pushes into [`ConfigDiagnostics`], warnings are
//! logged, and the load fails once with all errors listed.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    // no #[source]: the diagnostics are already part of the message
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding about one config field.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    /// How to fix it, e.g. the command-line flag that overrides the field.
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint.dimmed())?;
        }
        Ok(())
    }
}

/// Findings of one validation pass, in check order.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    items: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.items.push(ConfigDiagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.by_severity(Severity::Warning)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &ConfigDiagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    pub fn print_warnings(&self) {
        for warning in self.warnings() {
            crate::log!("warning"; "{warning}");
        }
    }

    /// `Err(self)` if at least one error was pushed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors().next().is_none() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "invalid [combine] configuration:".red().bold())?;
        for error in self.errors() {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
