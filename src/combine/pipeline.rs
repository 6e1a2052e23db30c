//! Combine pipeline: inline imports, version urls, write back, clean up.
//!
//! ```text
//! for each entry:  load → inline @imports → version url(...) → overwrite entry
//! then once:       delete every inlined file not in the keep set
//! ```
//!
//! With `parallel`, all entries are rendered on the rayon pool first and
//! written back afterwards in entry order.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::CombineError;
use super::import::ImportResolver;
use super::sink::LogSink;
use super::tracking::{KeepSet, ProcessedFiles};
use super::version::{derive_version_token, versionize_urls_counted};
use crate::utils::path::relative_display;
use crate::utils::plural_count;

/// Everything one combine run needs.
#[derive(Debug, Clone, Default)]
pub struct CombineOptions {
    /// Entry stylesheets, combined in place in this order.
    pub entry_files: Vec<PathBuf>,
    /// Base for `/`-rooted imports and for log display.
    pub working_dir: PathBuf,
    /// Inlined files that must not be deleted.
    pub keep_files: Vec<PathBuf>,
    /// Raw build version (e.g. `1.4.0.2817`). `None` skips url versioning.
    pub raw_version: Option<String>,
    pub verbose: bool,
    /// Combine entries on the rayon pool.
    pub parallel: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Entry files that were rewritten.
    pub combined: Vec<PathBuf>,
    /// Inlined files that were removed.
    pub deleted: Vec<PathBuf>,
    /// Inlined files protected by the keep set.
    pub kept: Vec<PathBuf>,
    /// Inlined files that could not be removed.
    pub failed_deletions: Vec<PathBuf>,
}

/// A combined entry, held in memory until it is written back.
struct Rendered {
    text: String,
    imported: ProcessedFiles,
}

/// Combine every entry file, then delete inlined files not kept.
///
/// The first load or save error aborts the run before anything is deleted.
/// Deletion failures are logged and reported, not returned as errors.
pub fn run_combine_pipeline(
    options: &CombineOptions,
    sink: &dyn LogSink,
) -> Result<CombineReport, CombineError> {
    run_with_progress(options, sink, |_| {})
}

/// Like [`run_combine_pipeline`], calling `on_entry` after each entry is written.
///
/// In parallel mode every entry is rendered before the first one is written,
/// so an entry that another entry imports is always read in its original form.
pub fn run_with_progress<F>(
    options: &CombineOptions,
    sink: &dyn LogSink,
    on_entry: F,
) -> Result<CombineReport, CombineError>
where
    F: Fn(&Path),
{
    let pipeline = Pipeline::new(options, sink);
    pipeline.print_info();

    let mut processed = ProcessedFiles::new();
    if options.parallel {
        let rendered = options
            .entry_files
            .par_iter()
            .map(|entry| pipeline.render_entry(entry))
            .collect::<Result<Vec<_>, CombineError>>()?;

        for (entry, rendered) in options.entry_files.iter().zip(rendered) {
            write_entry(entry, &rendered.text)?;
            processed.merge(rendered.imported);
            on_entry(entry);
        }
    } else {
        for entry in &options.entry_files {
            let rendered = pipeline.render_entry(entry)?;
            write_entry(entry, &rendered.text)?;
            processed.merge(rendered.imported);
            on_entry(entry);
        }
    }

    let mut report = pipeline.delete_processed(&processed);
    report.combined = options.entry_files.clone();
    Ok(report)
}

fn write_entry(entry: &Path, text: &str) -> Result<(), CombineError> {
    fs::write(entry, text).map_err(|source| CombineError::Save {
        path: entry.to_path_buf(),
        source,
    })
}

struct Pipeline<'a> {
    options: &'a CombineOptions,
    sink: &'a dyn LogSink,
    token: Option<String>,
    keep: KeepSet,
}

impl<'a> Pipeline<'a> {
    fn new(options: &'a CombineOptions, sink: &'a dyn LogSink) -> Self {
        Self {
            options,
            sink,
            token: options.raw_version.as_deref().map(derive_version_token),
            keep: KeepSet::new(&options.keep_files),
        }
    }

    fn rel(&self, path: &Path) -> String {
        relative_display(path, &self.options.working_dir)
    }

    fn debug(&self, module: &str, message: &str) {
        if self.options.verbose {
            self.sink.line(module, message);
        }
    }

    fn print_info(&self) {
        let sink = self.sink;
        let files = plural_count(self.options.entry_files.len(), "file");
        sink.line(
            "combine",
            &format!("working dir: {}", self.options.working_dir.display()),
        );
        sink.line("combine", &format!("{files} to process:"));
        for entry in &self.options.entry_files {
            sink.line("combine", &format!("  {}", self.rel(entry)));
        }
        if !self.options.keep_files.is_empty() {
            sink.line("combine", "files that won't be deleted:");
            for keep in &self.options.keep_files {
                sink.line("combine", &format!("  {}", self.rel(keep)));
            }
        }
        match &self.token {
            Some(token) => self.debug("version", &format!("version token: {token}")),
            None => sink.line("version", "no version set, url versioning skipped"),
        }
    }

    fn render_entry(&self, entry: &Path) -> Result<Rendered, CombineError> {
        self.debug("scan", &format!("scanning: {}", self.rel(entry)));

        let combined = ImportResolver::new(&self.options.working_dir, self.sink)
            .verbose(self.options.verbose)
            .combine(entry)?;

        let text = match &self.token {
            Some(token) => {
                let (text, changed) = versionize_urls_counted(&combined.text, token);
                self.debug(
                    "version",
                    &format!("{}: {} versioned", self.rel(entry), plural_count(changed, "url")),
                );
                text
            }
            None => combined.text,
        };

        Ok(Rendered {
            text,
            imported: combined.imported,
        })
    }

    fn delete_processed(&self, processed: &ProcessedFiles) -> CombineReport {
        let mut report = CombineReport::default();
        for file in processed {
            if self.keep.contains(file) {
                self.sink
                    .line("keep", &format!("keeping file: {}", self.rel(file)));
                report.kept.push(file.clone());
                continue;
            }

            self.sink
                .line("delete", &format!("deleting: {}", self.rel(file)));
            match fs::remove_file(file) {
                Ok(()) => report.deleted.push(file.clone()),
                Err(e) => {
                    self.sink.line(
                        "warning",
                        &format!("failed to delete {}: {e}", self.rel(file)),
                    );
                    report.failed_deletions.push(file.clone());
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::sink::{MemorySink, NullSink};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn options(dir: &Path, entries: Vec<PathBuf>) -> CombineOptions {
        CombineOptions {
            entry_files: entries,
            working_dir: dir.to_path_buf(),
            raw_version: Some("9.1.0.42".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_to_end() {
        let dir = TempDir::new().unwrap();
        let main = write(
            dir.path(),
            "main.css",
            "@import url(\"base.css\");\nbackground: url(bg.png);",
        );
        let base = write(dir.path(), "base.css", ".a{color:red}");

        let report = run_combine_pipeline(&options(dir.path(), vec![main.clone()]), &NullSink)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            ".a{color:red}\nbackground: url(bg.png?v=42);"
        );
        assert!(!base.exists());
        assert_eq!(report.combined, vec![main]);
        assert_eq!(report.deleted, vec![base]);
        assert!(report.kept.is_empty());
    }

    #[test]
    fn test_keep_set_protects_file() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "main.css", "@import url(\"base.css\");");
        let base = write(dir.path(), "base.css", ".a{}");

        let mut opts = options(dir.path(), vec![main]);
        opts.keep_files = vec![dir.path().join("BASE.CSS")];

        let sink = MemorySink::new();
        let report = run_combine_pipeline(&opts, &sink).unwrap();

        assert!(base.exists());
        assert_eq!(report.kept, vec![base]);
        assert!(report.deleted.is_empty());
        assert!(sink.contains("keeping file: base.css"));
    }

    #[test]
    fn test_imported_content_is_versioned() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "css/main.css", "@import url(parts/a.css);");
        write(dir.path(), "css/parts/a.css", ".a{background:url('../img/a.png')}");

        run_combine_pipeline(&options(dir.path(), vec![main.clone()]), &NullSink).unwrap();
        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            ".a{background:url('../img/a.png?v=42')}"
        );
    }

    #[test]
    fn test_union_across_entries_deleted_once() {
        let dir = TempDir::new().unwrap();
        let first = write(dir.path(), "first.css", "@import url(shared.css);\n.first{}");
        let second = write(dir.path(), "second.css", "@import url(shared.css);\n.second{}");
        let shared = write(dir.path(), "shared.css", ".shared{}");

        let report =
            run_combine_pipeline(&options(dir.path(), vec![first.clone(), second.clone()]), &NullSink)
                .unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), ".shared{}\n.first{}");
        assert_eq!(fs::read_to_string(&second).unwrap(), ".shared{}\n.second{}");
        assert_eq!(report.deleted, vec![shared]);
    }

    #[test]
    fn test_entry_without_imports_is_not_deleted() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "main.css", ".a{background:url(a.png)}");

        let report = run_combine_pipeline(&options(dir.path(), vec![main.clone()]), &NullSink)
            .unwrap();

        assert!(main.exists());
        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            ".a{background:url(a.png?v=42)}"
        );
        assert!(report.deleted.is_empty());
    }

    #[test]
    fn test_without_version_skips_urls() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "main.css", "@import url(a.css);");
        write(dir.path(), "a.css", ".a{background:url(a.png)}");

        let mut opts = options(dir.path(), vec![main.clone()]);
        opts.raw_version = None;

        let sink = MemorySink::new();
        run_combine_pipeline(&opts, &sink).unwrap();

        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            ".a{background:url(a.png)}"
        );
        assert!(sink.contains("url versioning skipped"));
    }

    #[test]
    fn test_load_error_aborts_before_deletion() {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.css", "@import url(base.css);");
        let base = write(dir.path(), "base.css", ".a{}");
        let bad = write(dir.path(), "bad.css", "@import url(missing.css);");

        let err =
            run_combine_pipeline(&options(dir.path(), vec![good.clone(), bad]), &NullSink)
                .unwrap_err();

        assert!(matches!(err, CombineError::Load { .. }));
        // first entry was written, but nothing was deleted
        assert_eq!(fs::read_to_string(&good).unwrap(), ".a{}");
        assert!(base.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "main.css", ".a{}");
        fs::set_permissions(&main, fs::Permissions::from_mode(0o444)).unwrap();

        // root ignores file permissions
        if fs::OpenOptions::new().write(true).open(&main).is_ok() {
            return;
        }

        let err = run_combine_pipeline(&options(dir.path(), vec![main.clone()]), &NullSink)
            .unwrap_err();
        match err {
            CombineError::Save { path, .. } => assert_eq!(path, main),
            other => panic!("expected save error, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_deletion_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let first = write(dir.path(), "first.css", "@import url(base.css);");
        let second = write(dir.path(), "second.css", "@import url(base.css);");
        let base = write(dir.path(), "base.css", ".a{}");

        // base.css disappears after the last entry is combined, so the
        // deletion pass finds it missing.
        let opts = options(dir.path(), vec![first, second]);
        let sink = MemorySink::new();
        let report = run_with_progress(&opts, &sink, |entry| {
            if entry.ends_with("second.css") {
                fs::remove_file(&base).unwrap();
            }
        })
        .unwrap();

        assert_eq!(report.failed_deletions, vec![base]);
        assert!(sink.contains("failed to delete base.css"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        let mut entries = Vec::new();
        for i in 0..8 {
            write(dir.path(), &format!("part{i}.css"), &format!(".p{i}{{background:url(p{i}.png)}}"));
            entries.push(write(
                dir.path(),
                &format!("entry{i}.css"),
                &format!("@import url(part{i}.css);\n@import url(common.css);"),
            ));
        }
        write(dir.path(), "common.css", ".c{}");

        let mut opts = options(dir.path(), entries.clone());
        opts.parallel = true;

        let count = AtomicUsize::new(0);
        let report = run_with_progress(&opts, &NullSink, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(count.load(Ordering::Relaxed), 8);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(
                fs::read_to_string(entry).unwrap(),
                format!(".p{i}{{background:url(p{i}.png?v=42)}}\n.c{{}}")
            );
        }
        // part0, common, part1, part2, ...: union in entry order
        assert_eq!(report.deleted.len(), 9);
        assert_eq!(report.deleted[0], dir.path().join("part0.css"));
        assert_eq!(report.deleted[1], dir.path().join("common.css"));
    }

    #[test]
    fn test_parallel_entry_imported_by_other_entries() {
        fn layout(dir: &Path) -> Vec<PathBuf> {
            let mut entries = vec![write(dir, "base.css", ".b{background:url(b.png)}")];
            for i in 0..6 {
                entries.push(write(
                    dir,
                    &format!("page{i}.css"),
                    &format!("@import url(base.css);\n.page{i}{{}}"),
                ));
            }
            entries
        }

        let sequential = TempDir::new().unwrap();
        let parallel = TempDir::new().unwrap();
        let seq_entries = layout(sequential.path());
        let par_entries = layout(parallel.path());

        run_combine_pipeline(&options(sequential.path(), seq_entries.clone()), &NullSink).unwrap();
        let mut opts = options(parallel.path(), par_entries.clone());
        opts.parallel = true;
        let report = run_combine_pipeline(&opts, &NullSink).unwrap();

        for (i, (seq, par)) in seq_entries.iter().zip(&par_entries).enumerate().skip(1) {
            let expected = format!(".b{{background:url(b.png?v=42)}}\n.page{}{{}}", i - 1);
            assert_eq!(fs::read_to_string(par).unwrap(), expected);
            assert_eq!(fs::read_to_string(seq).unwrap(), expected);
        }
        // imported by the pages, so it is cleaned up even though it is an entry
        assert_eq!(report.deleted, vec![par_entries[0].clone()]);
        assert!(!par_entries[0].exists());
    }

    #[test]
    fn test_info_lines() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "css/main.css", ".a{}");

        let mut opts = options(dir.path(), vec![main]);
        opts.keep_files = vec![dir.path().join("css/print.css")];
        opts.verbose = true;

        let sink = MemorySink::new();
        run_combine_pipeline(&opts, &sink).unwrap();

        assert!(sink.contains("1 file to process:"));
        assert!(sink.contains("css/main.css"));
        assert!(sink.contains("files that won't be deleted:"));
        assert!(sink.contains("version token: 42"));
        assert!(sink.contains("scanning: css/main.css"));
        assert!(sink.contains("0 urls versioned"));
    }
}
