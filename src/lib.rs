//! csscombine - inline css `@import` directives and cache-bust `url()` references.
//!
//! The library half holds the transforms and the pipeline; the binary is a
//! thin CLI over [`combine::run_combine_pipeline`].
//!
//! ```ignore
//! use csscombine::combine::{CombineOptions, ConsoleSink, run_combine_pipeline};
//!
//! let options = CombineOptions {
//!     entry_files: vec!["wwwroot/css/site.css".into()],
//!     working_dir: "wwwroot".into(),
//!     raw_version: Some("1.4.0.2817".into()),
//!     ..Default::default()
//! };
//! let report = run_combine_pipeline(&options, &ConsoleSink)?;
//! ```

pub mod cli;
pub mod combine;
pub mod config;
pub mod logger;
pub mod utils;
