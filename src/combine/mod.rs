//! Stylesheet combining: `@import` inlining and `url()` cache busting.
//!
//! | Module     | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `import`   | Recursive `@import url(...)` inlining            |
//! | `version`  | `?v=<token>` parameters on `url(...)` references |
//! | `pipeline` | Run both over entry files, delete inlined files  |
//! | `tracking` | Processed-file and keep-file sets                |
//! | `sink`     | Injected log destinations                        |
//! | `error`    | `CombineError`                                   |

mod error;
mod import;
mod pipeline;
mod sink;
mod tracking;
mod version;

pub use error::CombineError;
pub use import::{Combined, ImportDirective, ImportResolver, combine_imports, full_path, scan_imports};
pub use pipeline::{CombineOptions, CombineReport, run_combine_pipeline, run_with_progress};
pub use sink::{ConsoleSink, LogSink, MemorySink, NullSink};
pub use tracking::{KeepSet, ProcessedFiles};
pub use version::{
    UrlReference, derive_version_token, scan_urls, versionize_urls, versionize_urls_counted,
};
