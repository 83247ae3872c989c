//! Project configuration loader describing where the manifest and tile-maps live.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FixerError, FixerResult};
use crate::project::{AssetLayout, DEFAULT_IMAGE_DIR, DEFAULT_MANIFEST_PATH, DEFAULT_TILEMAP_DIR};
use crate::walker::FailurePolicy;

const DEFAULT_CONFIG_FILE: &str = "asset_fixer.config.json";

/// Discoverable project configuration describing the asset tree layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Manifest path relative to the project root.
    pub manifest_path: String,
    /// Base image directory relative to the project root.
    pub image_dir: String,
    /// Tile-map root directory relative to the project root.
    pub tilemap_dir: String,
    /// Keep walking when a single tile-map fails instead of aborting the run.
    pub keep_going: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest_path: DEFAULT_MANIFEST_PATH.into(),
            image_dir: DEFAULT_IMAGE_DIR.into(),
            tilemap_dir: DEFAULT_TILEMAP_DIR.into(),
            keep_going: false,
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the provided project root.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to the
    /// conventional layout, so a bare invocation behaves like the fixed pipeline step.
    pub fn discover(root: &Path) -> Self {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file, ignoring failures.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Read configuration from a file the caller asked for explicitly.
    pub fn load_from_path(path: &Path) -> FixerResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| FixerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| FixerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the configured relative paths against `root`.
    pub fn to_layout(&self, root: &Path) -> AssetLayout {
        AssetLayout {
            manifest_path: root.join(&self.manifest_path),
            image_dir: root.join(&self.image_dir),
            tilemap_dir: root.join(&self.tilemap_dir),
        }
    }

    /// Failure handling requested by the configuration.
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Isolate
        } else {
            FailurePolicy::Abort
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_falls_back_to_defaults_without_file() {
        let temp = tempdir().unwrap();
        let config = ProjectConfig::discover(temp.path());
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.to_layout(temp.path()), AssetLayout::under(temp.path()));
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);
    }

    #[test]
    fn discover_ignores_unparsable_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(ProjectConfig::discover(temp.path()), ProjectConfig::default());
    }

    #[test]
    fn discover_reads_partial_overrides() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{"tilemap_dir": "content/maps", "keep_going": true}"#,
        )
        .unwrap();

        let config = ProjectConfig::discover(temp.path());
        assert_eq!(config.manifest_path, DEFAULT_MANIFEST_PATH);
        assert_eq!(config.tilemap_dir, "content/maps");
        assert_eq!(config.failure_policy(), FailurePolicy::Isolate);

        let layout = config.to_layout(temp.path());
        assert_eq!(layout.tilemap_dir, temp.path().join("content/maps"));
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let temp = tempdir().unwrap();
        let err = ProjectConfig::load_from_path(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, FixerError::ConfigRead { .. }));
    }

    #[test]
    fn load_from_path_reports_parse_errors() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("fixer.json");
        fs::write(&path, "[1, 2").unwrap();
        let err = ProjectConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, FixerError::ConfigParse { .. }));
    }
}
