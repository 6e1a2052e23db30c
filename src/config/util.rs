//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/site/wwwroot/css/   ← start
/// /home/user/site/csscombine.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("csscombine.toml");
        fs::write(&config, "").unwrap();
        let nested = dir.path().join("wwwroot/css");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_config_file(Path::new("csscombine.toml"), &nested),
            Some(config)
        );
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("build.toml");
        assert_eq!(find_config_file(&config, dir.path()), None);

        fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(&config, Path::new("/")), Some(config));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            find_config_file(Path::new("no-such-config-3f9a.toml"), dir.path()),
            None
        );
    }
}
