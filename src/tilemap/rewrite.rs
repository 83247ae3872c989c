//! Rewriting tileset image references inside tile-map JSON documents.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::error::{FixerError, FixerResult};
use crate::manifest::PathIndex;
use crate::models::RewriteOutcome;
use crate::tilemap::find_logical_path;

const TILESETS_KEY: &str = "tilesets";
const IMAGE_KEY: &str = "image";
const INDENT: &[u8] = b"    ";

/// Rewrite tileset image references of an in-memory tile-map document.
///
/// Image values are resolved against the directory containing `tilemap_path`. Returns
/// `None` when the document has no tilesets, otherwise the number of changed references.
pub fn rewrite_tilemap_document(
  document: &mut Value,
  tilemap_path: &Path,
  index: &PathIndex,
) -> FixerResult<Option<usize>> {
  let shape_error = |reason: &'static str| FixerError::TilemapShape {
    path: tilemap_path.to_path_buf(),
    reason,
  };

  let object = document
    .as_object_mut()
    .ok_or_else(|| shape_error("document root is not an object"))?;
  let tilesets = match object.get_mut(TILESETS_KEY) {
    None | Some(Value::Null) => return Ok(None),
    Some(Value::Array(tilesets)) => tilesets,
    Some(_) => return Err(shape_error("`tilesets` is not an array")),
  };
  if tilesets.is_empty() {
    return Ok(None);
  }

  let tilemap_dir = tilemap_path.parent().unwrap_or_else(|| Path::new(""));
  let mut rewritten = 0;

  for tileset in tilesets.iter_mut() {
    let Some(record) = tileset.as_object_mut() else {
      continue;
    };
    let Some(image) = record.get(IMAGE_KEY).and_then(Value::as_str) else {
      continue;
    };
    if image.is_empty() {
      continue;
    }

    let Some(logical) = find_logical_path(index, &tilemap_dir.join(image))? else {
      continue;
    };
    if logical != image {
      debug!(from = image, to = logical, "rewriting tileset image");
      rewritten += 1;
    }
    record.insert(IMAGE_KEY.to_string(), Value::String(logical.to_string()));
  }

  Ok(Some(rewritten))
}

/// Rewrite the tile-map at `path` in place using `index`.
///
/// Files without tilesets are left untouched. Any other parsable file is serialised back
/// with four-space indentation, even when no reference changed.
pub fn rewrite_tilemap(path: &Path, index: &PathIndex) -> FixerResult<RewriteOutcome> {
  let content = fs::read_to_string(path).map_err(|source| FixerError::TilemapRead {
    path: path.to_path_buf(),
    source,
  })?;
  let mut document: Value =
    serde_json::from_str(&content).map_err(|source| FixerError::TilemapParse {
      path: path.to_path_buf(),
      source,
    })?;

  let Some(rewritten) = rewrite_tilemap_document(&mut document, path, index)? else {
    return Ok(RewriteOutcome::Skipped);
  };

  let encoded = to_indented_json(&document).map_err(|source| FixerError::TilemapEncode {
    path: path.to_path_buf(),
    source,
  })?;
  fs::write(path, encoded).map_err(|source| FixerError::TilemapWrite {
    path: path.to_path_buf(),
    source,
  })?;

  Ok(RewriteOutcome::Written { rewritten })
}

fn to_indented_json(document: &Value) -> Result<Vec<u8>, serde_json::Error> {
  let mut buffer = Vec::new();
  let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
  document.serialize(&mut serializer)?;
  Ok(buffer)
}
