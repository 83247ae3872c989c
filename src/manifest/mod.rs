//! Asset manifest parsing into a path index.

mod index;
mod scanner;

pub use index::PathIndex;
pub use scanner::{ManifestScanner, load_path_index, parse_manifest};
