use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Mapping from resolved on-disk image paths to the logical paths declared in the manifest.
///
/// Keys keep manifest order, which is the tie-break order when several keys denote the same
/// file. Re-inserting a key replaces its logical path but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
  entries: IndexMap<PathBuf, String>,
}

impl PathIndex {
  /// Create an empty index.
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn insert(&mut self, resolved: PathBuf, logical: String) {
    self.entries.insert(resolved, logical);
  }

  /// Logical path recorded for an exact resolved path, without identity resolution.
  #[cfg(test)]
  pub(crate) fn get(&self, resolved: &Path) -> Option<&str> {
    self.entries.get(resolved).map(String::as_str)
  }

  /// Number of indexed images.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the manifest declared no usable images.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate `(resolved, logical)` pairs in manifest order.
  pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
    self
      .entries
      .iter()
      .map(|(resolved, logical)| (resolved.as_path(), logical.as_str()))
  }
}
