//! Run orchestrator: build the manifest index once, then rewrite every tile-map under the root.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{FixerError, FixerResult};
use crate::manifest::{PathIndex, load_path_index};
use crate::models::{FileFailure, RunReport};
use crate::project::AssetLayout;
use crate::tilemap::rewrite_tilemap;

/// What the walker does when a single tile-map fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
  /// Stop at the first failing file. Files already rewritten stay rewritten.
  #[default]
  Abort,
  /// Log the failure, record it in the report and continue with the next file.
  Isolate,
}

/// High-level helper running the full fix over an asset layout.
pub struct AssetFixer<'a> {
  layout: &'a AssetLayout,
  policy: FailurePolicy,
}

impl<'a> AssetFixer<'a> {
  /// Create a fixer for the provided layout, aborting on the first failure.
  pub fn new(layout: &'a AssetLayout) -> Self {
    Self {
      layout,
      policy: FailurePolicy::default(),
    }
  }

  /// Override how per-file failures are handled.
  pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Build the path index from the manifest, then rewrite the tile-map tree.
  ///
  /// A manifest error aborts before any tile-map is touched, whatever the failure policy.
  pub fn run(&self) -> FixerResult<RunReport> {
    let index = self.build_index()?;
    self.process_tree(&index)
  }

  /// Parse the manifest into a path index.
  pub fn build_index(&self) -> FixerResult<PathIndex> {
    let index = load_path_index(&self.layout.manifest_path, &self.layout.image_dir)?;
    info!(
      manifest = %self.layout.manifest_path.display(),
      images = index.len(),
      "loaded asset manifest"
    );
    Ok(index)
  }

  /// Rewrite every file under the tile-map root against an already built index.
  pub fn process_tree(&self, index: &PathIndex) -> FixerResult<RunReport> {
    let mut report = RunReport::default();

    for path in collect_tilemap_files(&self.layout.tilemap_dir)? {
      info!("modifying {} ...", path.display());
      report.files_visited += 1;

      match rewrite_tilemap(&path, index) {
        Ok(outcome) => report.record(outcome),
        Err(error) => match self.policy {
          FailurePolicy::Abort => return Err(error),
          FailurePolicy::Isolate => {
            warn!(error = %error, "skipping tile-map");
            report.failures.push(FileFailure { path, error });
          }
        },
      }
    }

    Ok(report)
  }
}

/// Enumerate every file below `root`, recursively.
///
/// Symlinks resolving to files are included; symlinked directories are not descended into.
/// A missing root yields no files, matching an empty tree.
pub fn collect_tilemap_files(root: &Path) -> FixerResult<Vec<PathBuf>> {
  if !root.exists() {
    warn!(root = %root.display(), "tile-map directory does not exist");
    return Ok(Vec::new());
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|source| FixerError::Walk { source })?;
    if entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file()) {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::{TempDir, tempdir};

  const MANIFEST: &str = r#"<assets>
  <texture>
    <element path="tiles/grass.png"/>
    <element path="tiles/water.png"/>
  </texture>
</assets>"#;

  fn project() -> (TempDir, AssetLayout) {
    let temp = tempdir().unwrap();
    let layout = AssetLayout::under(temp.path());
    fs::create_dir_all(layout.image_dir.join("tiles")).unwrap();
    fs::write(layout.image_dir.join("tiles/grass.png"), b"grass").unwrap();
    fs::write(layout.image_dir.join("tiles/water.png"), b"water").unwrap();
    fs::write(&layout.manifest_path, MANIFEST).unwrap();
    (temp, layout)
  }

  fn write_map(layout: &AssetLayout, relative: &str, content: &str) -> PathBuf {
    let path = layout.tilemap_dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
  }

  fn first_image(path: &Path) -> String {
    let document: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    document["tilesets"][0]["image"].as_str().unwrap().to_string()
  }

  #[test]
  fn collects_files_recursively() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("a/b")).unwrap();
    fs::write(temp.path().join("top.json"), "{}").unwrap();
    fs::write(temp.path().join("a/b/deep.json"), "{}").unwrap();

    let mut files = collect_tilemap_files(temp.path()).unwrap();
    files.sort();
    assert_eq!(files, vec![temp.path().join("a/b/deep.json"), temp.path().join("top.json")]);
  }

  #[cfg(unix)]
  #[test]
  fn collects_symlinked_files() {
    let temp = tempdir().unwrap();
    let maps = temp.path().join("maps");
    fs::create_dir_all(&maps).unwrap();
    fs::write(temp.path().join("real.json"), "{}").unwrap();
    std::os::unix::fs::symlink(temp.path().join("real.json"), maps.join("linked.json")).unwrap();
    std::os::unix::fs::symlink(temp.path().join("gone.json"), maps.join("dangling.json"))
      .unwrap();

    let files = collect_tilemap_files(&maps).unwrap();
    assert_eq!(files, vec![maps.join("linked.json")]);
  }

  #[test]
  fn missing_root_yields_no_files() {
    let temp = tempdir().unwrap();
    assert!(collect_tilemap_files(&temp.path().join("absent")).unwrap().is_empty());
  }

  #[test]
  fn rewrites_every_tilemap_in_tree() {
    let (_temp, layout) = project();
    let level1 = write_map(
      &layout,
      "level1/map.json",
      r#"{"tilesets": [{"image": "../../image/tiles/grass.png"}]}"#,
    );
    let level2 = write_map(
      &layout,
      "world/level2/map.json",
      r#"{"tilesets": [{"image": "../../../image/tiles/water.png"}]}"#,
    );
    write_map(&layout, "empty.json", r#"{"tilesets": []}"#);

    let report = AssetFixer::new(&layout).run().unwrap();

    assert_eq!(first_image(&level1), "tiles/grass.png");
    assert_eq!(first_image(&level2), "tiles/water.png");
    assert_eq!(report.files_visited, 3);
    assert_eq!(report.files_written, 2);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.tilesets_rewritten, 2);
    assert!(report.failures.is_empty());
  }

  #[test]
  fn rerunning_on_processed_tree_is_harmless() {
    let (_temp, layout) = project();
    let map = write_map(
      &layout,
      "level1/map.json",
      r#"{"tilesets": [{"image": "../../image/tiles/grass.png"}]}"#,
    );

    AssetFixer::new(&layout).run().unwrap();
    let processed = fs::read_to_string(&map).unwrap();
    let report = AssetFixer::new(&layout).run().unwrap();

    assert_eq!(report.tilesets_rewritten, 0);
    assert_eq!(fs::read_to_string(&map).unwrap(), processed);
  }

  #[test]
  fn abort_policy_stops_on_broken_tilemap() {
    let (_temp, layout) = project();
    write_map(&layout, "a_broken.json", "{ nope");
    let later = write_map(
      &layout,
      "b_level/map.json",
      r#"{"tilesets": [{"image": "../../image/tiles/grass.png"}]}"#,
    );

    let err = AssetFixer::new(&layout).run().unwrap_err();

    assert!(matches!(err, FixerError::TilemapParse { .. }));
    assert_eq!(first_image(&later), "../../image/tiles/grass.png");
  }

  #[test]
  fn isolate_policy_records_failures_and_continues() {
    let (_temp, layout) = project();
    let broken = write_map(&layout, "a_broken.json", "{ nope");
    let later = write_map(
      &layout,
      "b_level/map.json",
      r#"{"tilesets": [{"image": "../../image/tiles/grass.png"}]}"#,
    );

    let report = AssetFixer::new(&layout)
      .with_failure_policy(FailurePolicy::Isolate)
      .run()
      .unwrap();

    assert_eq!(first_image(&later), "tiles/grass.png");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, broken);
    assert_eq!(fs::read_to_string(&broken).unwrap(), "{ nope");
  }

  #[test]
  fn malformed_manifest_aborts_before_touching_tilemaps() {
    let (_temp, layout) = project();
    fs::write(&layout.manifest_path, "<assets><texture></assets>").unwrap();
    let original = r#"{"tilesets":[{"image":"../../image/tiles/grass.png"}]}"#;
    let map = write_map(&layout, "level1/map.json", original);

    let err = AssetFixer::new(&layout)
      .with_failure_policy(FailurePolicy::Isolate)
      .run()
      .unwrap_err();

    assert!(matches!(err, FixerError::ManifestParse { .. }));
    assert_eq!(fs::read_to_string(&map).unwrap(), original);
  }

  #[test]
  fn empty_manifest_aborts_before_touching_tilemaps() {
    let (_temp, layout) = project();
    fs::write(&layout.manifest_path, "").unwrap();
    let original = r#"{"tilesets":[{"image":"../../image/tiles/grass.png"}]}"#;
    let map = write_map(&layout, "level1/map.json", original);

    let err = AssetFixer::new(&layout).run().unwrap_err();

    assert!(matches!(err, FixerError::ManifestStructure { .. }));
    assert_eq!(fs::read_to_string(&map).unwrap(), original);
  }
}
