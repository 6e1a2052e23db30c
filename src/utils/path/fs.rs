//! File system path helpers.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `relative_display` - short form for log lines

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Display `path` relative to `base` when it lives below it.
///
/// # Example
/// ```ignore
/// relative_display(Path::new("/site/css/main.css"), Path::new("/site")) // "css/main.css"
/// relative_display(Path::new("/other/a.css"), Path::new("/site"))       // "/other/a.css"
/// ```
pub fn relative_display(path: &Path, base: &Path) -> String {
    if base.as_os_str().is_empty() {
        return path.display().to_string();
    }
    path.strip_prefix(base)
        .map(|rel| rel.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.css");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.css");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_relative_display() {
        assert_eq!(
            relative_display(Path::new("/site/css/main.css"), Path::new("/site")),
            "css/main.css"
        );
        assert_eq!(
            relative_display(Path::new("/site/css/main.css"), Path::new("/site/")),
            "css/main.css"
        );
        assert_eq!(
            relative_display(Path::new("/other/a.css"), Path::new("/site")),
            "/other/a.css"
        );
        assert_eq!(
            relative_display(Path::new("a.css"), Path::new("")),
            "a.css"
        );
    }
}
