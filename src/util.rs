//! util
//!
//! Path helpers.

use std::path::{Path, PathBuf};

/// Remove directories that are already covered by a parent in the list.
///
/// Paths are compared component-wise, so `/a` covers `/a/b` but not `/ab`.
/// Duplicates collapse into one entry. The result is sorted.
pub fn remove_redundant_dirs<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut sorted: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    sorted.sort();

    let mut kept: Vec<PathBuf> = Vec::with_capacity(sorted.len());
    for path in sorted {
        match kept.last() {
            Some(parent) if path.starts_with(parent) => {}
            _ => kept.push(path),
        }
    }
    kept
}
