//! Stylesheet combining errors.

use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while combining stylesheets.
///
/// Every variant aborts the current run: a half-combined stylesheet is
/// never written.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("cannot open file: {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save file: {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import cycle detected: {}", format_chain(chain))]
    ImportCycle { chain: Vec<PathBuf> },
}

fn format_chain(chain: &[PathBuf]) -> String {
    let mut out = String::new();
    for (i, path) in chain.iter().enumerate() {
        if i > 0 {
            out.push_str(" -> ");
        }
        let _ = write!(out, "{}", path.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_load_error_display() {
        let err = CombineError::Load {
            path: PathBuf::from("css/base.css"),
            source: Error::new(ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(err.to_string(), "cannot open file: css/base.css");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_cycle_error_display() {
        let err = CombineError::ImportCycle {
            chain: vec![
                PathBuf::from("a.css"),
                PathBuf::from("b.css"),
                PathBuf::from("a.css"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "import cycle detected: a.css -> b.css -> a.css"
        );
    }
}
