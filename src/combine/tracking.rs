//! Bookkeeping for files pulled in by `@import` and files protected from
//! deletion.

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

use crate::utils::path::normalize_path;

/// Files inlined via `@import`, in first-seen order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedFiles {
    order: Vec<PathBuf>,
    seen: FxHashSet<PathBuf>,
}

impl ProcessedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`. Returns `false` if it was already recorded.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    /// Union with `other`, keeping this set's order first.
    pub fn merge(&mut self, other: ProcessedFiles) {
        for path in other.order {
            self.insert(path);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.order
    }
}

impl<'a> IntoIterator for &'a ProcessedFiles {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Files that must survive the deletion pass.
///
/// Matching is case-insensitive on the path text. Paths that only differ by
/// `..`/`.` segments or symlinks also match once both exist on disk.
#[derive(Debug, Clone, Default)]
pub struct KeepSet {
    folded: FxHashSet<String>,
    canonical: FxHashSet<PathBuf>,
}

impl KeepSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut keep = Self::default();
        for path in paths {
            let path = path.as_ref();
            keep.folded.insert(fold(path));
            if let Ok(canonical) = path.canonicalize() {
                keep.canonical.insert(canonical);
            }
        }
        keep
    }

    pub fn contains(&self, path: &Path) -> bool {
        if self.folded.contains(&fold(path)) {
            return true;
        }
        !self.canonical.is_empty() && self.canonical.contains(&normalize_path(path))
    }
}

fn fold(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
