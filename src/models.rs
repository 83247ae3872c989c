//! Data structures produced while rewriting a tile-map tree.

use std::path::PathBuf;

use crate::error::FixerError;

/// Result of processing a single tile-map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// The document had no tilesets, so the file was left untouched.
  Skipped,
  /// The document was serialised back over the original file.
  Written {
    /// Number of tilesets whose `image` value changed.
    rewritten: usize,
  },
}

/// Tile-map that failed while the walker was isolating per-file failures.
#[derive(Debug)]
pub struct FileFailure {
  /// Tile-map that failed.
  pub path: PathBuf,
  /// Error raised while processing it.
  pub error: FixerError,
}

/// Totals collected over one run of the walker.
#[derive(Debug, Default)]
pub struct RunReport {
  /// Number of candidate files handed to the rewriter.
  pub files_visited: usize,
  /// Files serialised back to disk.
  pub files_written: usize,
  /// Files left untouched because they had no tilesets.
  pub files_skipped: usize,
  /// Tilesets whose image reference changed.
  pub tilesets_rewritten: usize,
  /// Files that failed, only populated under [`crate::FailurePolicy::Isolate`].
  pub failures: Vec<FileFailure>,
}

impl RunReport {
  pub(crate) fn record(&mut self, outcome: RewriteOutcome) {
    match outcome {
      RewriteOutcome::Skipped => self.files_skipped += 1,
      RewriteOutcome::Written { rewritten } => {
        self.files_written += 1;
        self.tilesets_rewritten += rewritten;
      }
    }
  }
}
