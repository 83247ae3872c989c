#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest;
pub mod models;
pub mod project;
pub mod tilemap;
pub mod walker;

pub use config::ProjectConfig;
pub use error::{FixerError, FixerResult};
pub use manifest::PathIndex;
pub use models::{RewriteOutcome, RunReport};
pub use project::AssetLayout;
pub use walker::{AssetFixer, FailurePolicy};
