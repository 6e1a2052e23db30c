//! `combine` command: config → file sets → pipeline.

use anyhow::{Context, Result};
use std::path::Path;

use crate::combine::{ConsoleSink, run_with_progress};
use crate::config::CombineConfig;
use crate::logger::ProgressLine;
use crate::utils::plural_count;
use crate::{debug, log};

use super::CombineArgs;

/// Load configuration and combine every configured entry stylesheet.
pub fn run_combine(config_name: &Path, args: &CombineArgs) -> Result<()> {
    let config = CombineConfig::load(config_name, args)?;
    if !config.config_path.as_os_str().is_empty() {
        debug!("config"; "using {}", config.config_path.display());
    }

    let options = config
        .to_options()
        .context("Failed to expand file patterns")?;
    if options.entry_files.is_empty() {
        log!("combine"; "no entry files matched, nothing to do");
        return Ok(());
    }

    // verbose output is line-per-step, a progress line would only get in the way
    let progress = (!options.verbose)
        .then(|| ProgressLine::new("combine", &[("css", options.entry_files.len())]));

    let report = run_with_progress(&options, &ConsoleSink, |_| {
        if let Some(progress) = &progress {
            progress.inc("css");
        }
    })
    .context("Failed to combine stylesheets")?;

    if let Some(progress) = progress {
        progress.finish();
    }

    log!(
        "combine";
        "{} combined, {} deleted, {} kept",
        plural_count(report.combined.len(), "file"),
        report.deleted.len(),
        report.kept.len()
    );
    if !report.failed_deletions.is_empty() {
        log!(
            "warning";
            "{} could not be deleted",
            plural_count(report.failed_deletions.len(), "file")
        );
    }
    Ok(())
}
