//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `relative_display`)
//! - [`set`]: Glob-based file sets (`FileSet`)

pub mod fs;
pub mod set;

pub use fs::{normalize_path, relative_display};
pub use set::{FileSet, FileSetError};
