//! Event-driven scan of the asset manifest markup.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{FixerError, FixerResult};
use crate::manifest::PathIndex;

const TEXTURE_TAG: &[u8] = b"texture";
const ELEMENT_TAG: &[u8] = b"element";
const PATH_ATTRIBUTE: &str = "path";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SectionState {
  #[default]
  OutsideTexture,
  InsideTexture,
}

/// State machine fed with open/close events from the manifest markup.
///
/// Only `element` entries seen while a `texture` section is open contribute to the index.
/// Leaving any `texture` section returns to the outside state, even when sections nest.
#[derive(Debug)]
pub struct ManifestScanner<'a> {
  image_dir: &'a Path,
  state: SectionState,
  index: PathIndex,
}

impl<'a> ManifestScanner<'a> {
  /// Create a scanner resolving manifest paths against `image_dir`.
  pub fn new(image_dir: &'a Path) -> Self {
    Self {
      image_dir,
      state: SectionState::OutsideTexture,
      index: PathIndex::new(),
    }
  }

  /// Handle a section or entry opening.
  pub fn open(&mut self, tag: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
    let name = tag.name();
    if name.as_ref() == TEXTURE_TAG {
      self.state = SectionState::InsideTexture;
    }

    if self.state == SectionState::OutsideTexture || name.as_ref() != ELEMENT_TAG {
      return Ok(());
    }

    let Some(attribute) = tag
      .try_get_attribute(PATH_ATTRIBUTE)
      .map_err(quick_xml::Error::from)?
    else {
      return Ok(());
    };
    let logical = attribute
      .unescape_value()
      .map_err(quick_xml::Error::from)?;
    if logical.is_empty() {
      return Ok(());
    }

    let resolved = self.image_dir.join(&*logical);
    debug!(logical = %logical, resolved = %resolved.display(), "indexed manifest image");
    self.index.insert(resolved, logical.into_owned());
    Ok(())
  }

  /// Handle a section closing. Closing while outside a texture section is a no-op.
  pub fn close(&mut self, name: &[u8]) {
    if name == TEXTURE_TAG {
      self.state = SectionState::OutsideTexture;
    }
  }

  /// Consume the scanner, returning the populated index.
  pub fn finish(self) -> PathIndex {
    self.index
  }
}

enum ScanFailure {
  Markup(quick_xml::Error),
  Unclosed(usize),
  Structure(&'static str),
}

/// Tracks the single-root document shape around the section events.
#[derive(Debug, Default)]
struct DocumentShape {
  depth: usize,
  root_seen: bool,
  root_closed: bool,
}

impl DocumentShape {
  fn open(&mut self, self_closing: bool) -> Result<(), ScanFailure> {
    if self.depth == 0 {
      if self.root_closed {
        return Err(ScanFailure::Structure("multiple root elements"));
      }
      self.root_seen = true;
      self.root_closed = self_closing;
    }
    if !self_closing {
      self.depth += 1;
    }
    Ok(())
  }

  fn close(&mut self) {
    self.depth = self.depth.saturating_sub(1);
    if self.depth == 0 {
      self.root_closed = true;
    }
  }

  fn text(&self, content: &[u8]) -> Result<(), ScanFailure> {
    if self.depth == 0 && content.iter().any(|byte| !byte.is_ascii_whitespace()) {
      return Err(ScanFailure::Structure("text outside the root element"));
    }
    Ok(())
  }

  fn finish(&self) -> Result<(), ScanFailure> {
    if self.depth > 0 {
      return Err(ScanFailure::Unclosed(self.depth));
    }
    if !self.root_seen {
      return Err(ScanFailure::Structure("no root element"));
    }
    Ok(())
  }
}

fn scan_markup(markup: &str, image_dir: &Path) -> Result<PathIndex, ScanFailure> {
  let mut reader = Reader::from_str(markup);
  let mut scanner = ManifestScanner::new(image_dir);
  let mut shape = DocumentShape::default();

  loop {
    match reader.read_event().map_err(ScanFailure::Markup)? {
      Event::Start(tag) => {
        shape.open(false)?;
        scanner.open(&tag).map_err(ScanFailure::Markup)?;
      }
      Event::Empty(tag) => {
        shape.open(true)?;
        scanner.open(&tag).map_err(ScanFailure::Markup)?;
        scanner.close(tag.name().as_ref());
      }
      Event::End(tag) => {
        shape.close();
        scanner.close(tag.name().as_ref());
      }
      Event::Text(text) => shape.text(&text)?,
      Event::CData(data) => shape.text(&data)?,
      Event::Eof => break,
      _ => {}
    }
  }

  shape.finish()?;
  Ok(scanner.finish())
}

/// Build the path index from manifest markup already held in memory.
///
/// `source` is only used to label errors. Malformed markup yields no index at all.
pub fn parse_manifest(source: &Path, markup: &str, image_dir: &Path) -> FixerResult<PathIndex> {
  scan_markup(markup, image_dir).map_err(|failure| match failure {
    ScanFailure::Markup(err) => FixerError::ManifestParse {
      path: source.to_path_buf(),
      source: err,
    },
    ScanFailure::Unclosed(open) => FixerError::ManifestUnclosed {
      path: source.to_path_buf(),
      open,
    },
    ScanFailure::Structure(reason) => FixerError::ManifestStructure {
      path: source.to_path_buf(),
      reason,
    },
  })
}

/// Read the manifest at `manifest_path` and build the path index from it.
pub fn load_path_index(manifest_path: &Path, image_dir: &Path) -> FixerResult<PathIndex> {
  let markup = fs::read_to_string(manifest_path).map_err(|source| FixerError::ManifestRead {
    path: manifest_path.to_path_buf(),
    source,
  })?;
  parse_manifest(manifest_path, &markup, image_dir)
}
