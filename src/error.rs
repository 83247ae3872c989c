//! Error taxonomy shared by the manifest, tile-map and walker phases.

use std::path::PathBuf;

/// Errors raised while fixing tile-map asset paths.
#[derive(Debug)]
pub enum FixerError {
  /// Failed to read a configuration file given explicitly.
  ConfigRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse a configuration file given explicitly.
  ConfigParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// Failed to read the asset manifest from disk.
  ManifestRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The asset manifest markup is malformed.
  ManifestParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source markup error.
    source: quick_xml::Error,
  },
  /// The asset manifest ended while sections were still open.
  ManifestUnclosed {
    /// Path that caused the error.
    path: PathBuf,
    /// Number of sections left open at end of input.
    open: usize,
  },
  /// The asset manifest is not a single well-formed document.
  ManifestStructure {
    /// Path that caused the error.
    path: PathBuf,
    /// Description of the structural problem.
    reason: &'static str,
  },
  /// Failed to read a tile-map file.
  TilemapRead {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A tile-map file is not valid JSON.
  TilemapParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// A tile-map file is valid JSON but does not have the expected layout.
  TilemapShape {
    /// Path that caused the error.
    path: PathBuf,
    /// Description of the unexpected structure.
    reason: &'static str,
  },
  /// Failed to serialise a rewritten tile-map document.
  TilemapEncode {
    /// Path that caused the error.
    path: PathBuf,
    /// Source serialisation error.
    source: serde_json::Error,
  },
  /// Failed to write a rewritten tile-map back to disk.
  TilemapWrite {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A path could not be opened for file-identity comparison.
  Identity {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to enumerate the tile-map directory tree.
  Walk {
    /// Source directory walk error.
    source: walkdir::Error,
  },
}

impl std::fmt::Display for FixerError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ConfigRead { path, source } => {
        write!(f, "failed to read config {}: {}", path.display(), source)
      }
      Self::ConfigParse { path, source } => {
        write!(f, "failed to parse config {}: {}", path.display(), source)
      }
      Self::ManifestRead { path, source } => {
        write!(f, "failed to read manifest {}: {}", path.display(), source)
      }
      Self::ManifestParse { path, source } => {
        write!(f, "malformed manifest {}: {}", path.display(), source)
      }
      Self::ManifestUnclosed { path, open } => {
        write!(
          f,
          "malformed manifest {}: {} section(s) left open at end of input",
          path.display(),
          open
        )
      }
      Self::ManifestStructure { path, reason } => {
        write!(f, "malformed manifest {}: {}", path.display(), reason)
      }
      Self::TilemapRead { path, source } => {
        write!(f, "failed to read tile-map {}: {}", path.display(), source)
      }
      Self::TilemapParse { path, source } => {
        write!(f, "failed to parse tile-map {}: {}", path.display(), source)
      }
      Self::TilemapShape { path, reason } => {
        write!(f, "unexpected tile-map layout in {}: {}", path.display(), reason)
      }
      Self::TilemapEncode { path, source } => {
        write!(f, "failed to serialise tile-map {}: {}", path.display(), source)
      }
      Self::TilemapWrite { path, source } => {
        write!(f, "failed to write tile-map {}: {}", path.display(), source)
      }
      Self::Identity { path, source } => {
        write!(f, "failed to resolve file identity of {}: {}", path.display(), source)
      }
      Self::Walk { source } => write!(f, "failed to walk tile-map directory: {}", source),
    }
  }
}

impl std::error::Error for FixerError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::ConfigRead { source, .. }
      | Self::ManifestRead { source, .. }
      | Self::TilemapRead { source, .. }
      | Self::TilemapWrite { source, .. }
      | Self::Identity { source, .. } => Some(source),
      Self::ConfigParse { source, .. }
      | Self::TilemapParse { source, .. }
      | Self::TilemapEncode { source, .. } => Some(source),
      Self::ManifestParse { source, .. } => Some(source),
      Self::Walk { source } => Some(source),
      Self::ManifestUnclosed { .. }
      | Self::ManifestStructure { .. }
      | Self::TilemapShape { .. } => None,
    }
  }
}

/// Result alias used across the crate.
pub type FixerResult<T> = Result<T, FixerError>;
