//! Tile-map rewriting against a manifest path index.
//!
//! Identity resolution lives in its own submodule so that it can be tested against real
//! files independently of the JSON handling.

mod identity;
mod rewrite;

pub use identity::find_logical_path;
pub use rewrite::{rewrite_tilemap, rewrite_tilemap_document};
