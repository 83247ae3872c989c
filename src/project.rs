//! Filesystem layout of the asset tree processed by the fixer.

use std::path::{Path, PathBuf};

/// Default manifest location relative to the project root.
pub const DEFAULT_MANIFEST_PATH: &str = "assets/assets.xml";
/// Default base directory that manifest `path` attributes are relative to.
pub const DEFAULT_IMAGE_DIR: &str = "assets/image";
/// Default root directory holding the tile-map files.
pub const DEFAULT_TILEMAP_DIR: &str = "assets/tilemap";

/// Resolved locations of the manifest, image base directory and tile-map root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
  /// Markup manifest declaring logical image identifiers.
  pub manifest_path: PathBuf,
  /// Directory manifest image paths are joined onto.
  pub image_dir: PathBuf,
  /// Directory walked recursively for tile-map files.
  pub tilemap_dir: PathBuf,
}

impl AssetLayout {
  /// Conventional layout rooted at `root`.
  pub fn under(root: &Path) -> Self {
    Self {
      manifest_path: root.join(DEFAULT_MANIFEST_PATH),
      image_dir: root.join(DEFAULT_IMAGE_DIR),
      tilemap_dir: root.join(DEFAULT_TILEMAP_DIR),
    }
  }
}

impl Default for AssetLayout {
  fn default() -> Self {
    Self::under(Path::new("."))
  }
}
