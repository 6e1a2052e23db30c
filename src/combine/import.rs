//! `@import` inlining.
//!
//! Each `@import url(...)` directive is replaced by the full text of the file
//! it points at, after that file had its own imports inlined. Every file
//! pulled in this way is recorded so the pipeline can delete it afterwards.
//!
//! ```text
//! main.css                      base.css
//! @import url("base.css");      @import url(/css/reset.css);
//! body { ... }                  .a { ... }
//!
//! main.css after combining
//! <reset.css contents>
//! .a { ... }
//! body { ... }
//! ```

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::error::CombineError;
use super::sink::{LogSink, NullSink};
use super::tracking::ProcessedFiles;
use crate::utils::path::{normalize_path, relative_display};
use crate::utils::plural_count;

static RE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@import url\(([^)]+)\);?").expect("import pattern is valid")
});

/// One `@import url(...)` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportDirective<'a> {
    /// Full matched text, used as the substitution key.
    pub text: &'a str,
    /// Referenced path with whitespace and quotes stripped.
    pub path: &'a str,
}

impl<'a> ImportDirective<'a> {
    fn from_captures(caps: &Captures<'a>) -> Self {
        let text = caps.get(0).map_or("", |m| m.as_str());
        let raw = caps.get(1).map_or("", |m| m.as_str());
        Self {
            text,
            path: unquote(raw),
        }
    }

    /// Points at another host (`//cdn...`, `https://...`) and cannot be inlined.
    pub fn is_remote(&self) -> bool {
        self.path.contains("//")
    }
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(['"', '\'']).trim()
}

/// Find every `@import url(...)` directive in `css`, in source order.
pub fn scan_imports(css: &str) -> Vec<ImportDirective<'_>> {
    RE_IMPORT
        .captures_iter(css)
        .map(|caps| ImportDirective::from_captures(&caps))
        .collect()
}

/// Resolve an import path the way it is written in a stylesheet.
///
/// - `/css/reset.css` → `working_dir` (trailing `/` trimmed) + import path
/// - `reset.css`      → directory of `container` + import path
///
/// This is textual splicing: `..` and `.` segments are left for the file
/// system to resolve when the file is opened.
pub fn full_path(container: &Path, import_path: &str, working_dir: &Path) -> PathBuf {
    if import_path.starts_with('/') {
        let base = working_dir.to_string_lossy();
        return PathBuf::from(format!("{}{import_path}", base.trim_end_matches('/')));
    }

    let container_text = container.to_string_lossy();
    let dir = container
        .file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| container_text.strip_suffix(&*name).map(str::to_owned));

    match dir {
        Some(dir) => PathBuf::from(format!("{dir}{import_path}")),
        None => container
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(import_path),
    }
}

/// A stylesheet with all imports inlined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Combined {
    pub text: String,
    /// Files inlined into `text`, excluding the entry file.
    pub imported: ProcessedFiles,
}

/// Inline all imports of `entry`, without logging.
pub fn combine_imports(entry: &Path, working_dir: &Path) -> Result<Combined, CombineError> {
    ImportResolver::new(working_dir, &NullSink).combine(entry)
}

/// Recursive `@import` resolver for one entry stylesheet.
pub struct ImportResolver<'a> {
    working_dir: &'a Path,
    sink: &'a dyn LogSink,
    verbose: bool,
    /// Files currently being resolved, as (canonical, as-written).
    chain: Vec<(PathBuf, PathBuf)>,
    imported: ProcessedFiles,
}

impl<'a> ImportResolver<'a> {
    pub fn new(working_dir: &'a Path, sink: &'a dyn LogSink) -> Self {
        Self {
            working_dir,
            sink,
            verbose: false,
            chain: Vec::new(),
            imported: ProcessedFiles::new(),
        }
    }

    /// Also log loads and import counts.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Load `entry` and inline its imports, transitively.
    pub fn combine(mut self, entry: &Path) -> Result<Combined, CombineError> {
        let text = self.resolve(entry)?;
        Ok(Combined {
            text,
            imported: self.imported,
        })
    }

    fn resolve(&mut self, path: &Path) -> Result<String, CombineError> {
        let content = self.load(path)?;

        let canonical = normalize_path(path);
        if self.chain.iter().any(|(seen, _)| *seen == canonical) {
            let mut chain: Vec<PathBuf> = self.chain.iter().map(|(_, p)| p.clone()).collect();
            chain.push(path.to_path_buf());
            return Err(CombineError::ImportCycle { chain });
        }
        self.chain.push((canonical, path.to_path_buf()));

        let directives = scan_imports(&content);
        if directives.is_empty() {
            self.debug("scan", "no imports found");
        } else {
            self.debug(
                "scan",
                &format!("{} found", plural_count(directives.len(), "import")),
            );
        }

        let mut bodies: FxHashMap<&str, String> = FxHashMap::default();
        for directive in &directives {
            if bodies.contains_key(directive.text) {
                continue;
            }
            if directive.is_remote() {
                self.sink
                    .line("import", &format!("skipping remote import: {}", directive.path));
                continue;
            }

            self.sink
                .line("import", &format!("importing: {}", directive.path));
            let target = full_path(path, directive.path, self.working_dir);
            self.imported.insert(target.clone());
            let body = self.resolve(&target)?;
            bodies.insert(directive.text, body);
        }

        let combined = if bodies.is_empty() {
            content.clone()
        } else {
            RE_IMPORT
                .replace_all(&content, |caps: &Captures| match bodies.get(&caps[0]) {
                    Some(body) => body.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned()
        };

        self.chain.pop();
        Ok(combined)
    }

    fn load(&self, path: &Path) -> Result<String, CombineError> {
        self.debug(
            "load",
            &format!("loading: {}", relative_display(path, self.working_dir)),
        );
        fs::read_to_string(path).map_err(|source| CombineError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    fn debug(&self, module: &str, message: &str) {
        if self.verbose {
            self.sink.line(module, message);
        }
    }
}
