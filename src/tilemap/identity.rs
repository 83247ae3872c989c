use std::io::ErrorKind;
use std::path::Path;

use same_file::Handle;

use crate::error::{FixerError, FixerResult};
use crate::manifest::PathIndex;

/// Find the logical path of the index entry denoting the same file as `image_path`.
///
/// Paths are compared by file identity, so `..` segments, symlinks and differing relative
/// bases all resolve to the same entry. The first matching key in manifest order wins. A
/// path that does not exist or cannot be opened is treated as a non-match.
pub fn find_logical_path<'i>(
  index: &'i PathIndex,
  image_path: &Path,
) -> FixerResult<Option<&'i str>> {
  let Some(target) = open_handle(image_path)? else {
    return Ok(None);
  };

  for (resolved, logical) in index.iter() {
    let Some(candidate) = open_handle(resolved)? else {
      continue;
    };
    if candidate == target {
      return Ok(Some(logical));
    }
  }

  Ok(None)
}

fn open_handle(path: &Path) -> FixerResult<Option<Handle>> {
  match Handle::from_path(path) {
    Ok(handle) => Ok(Some(handle)),
    Err(err)
      if matches!(
        err.kind(),
        ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::PermissionDenied
      ) =>
    {
      Ok(None)
    }
    Err(source) => Err(FixerError::Identity {
      path: path.to_path_buf(),
      source,
    }),
  }
}
