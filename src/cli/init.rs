//! `init` command: write a default `csscombine.toml`.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::config::{DEFAULT_CONFIG, DEFAULT_CONFIG_TEMPLATE};
use crate::log;

/// Write the default config into `dir`, refusing to overwrite.
///
/// If `dry_run` is true, only prints the template to stdout.
pub fn write_default_config(dir: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{DEFAULT_CONFIG_TEMPLATE}");
        return Ok(());
    }

    let path = dir.join(DEFAULT_CONFIG);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;
    fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}
