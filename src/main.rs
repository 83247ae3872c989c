use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tilemap_asset_fixer::{AssetFixer, FailurePolicy, ProjectConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Rewrite tile-map image references to the logical paths declared in the asset manifest.
#[derive(Debug, Parser)]
#[command(name = "asset-fixer", version, about)]
struct Cli {
  /// Project root the asset layout is resolved against.
  #[arg(long, default_value = ".")]
  root: PathBuf,
  /// Configuration file to use instead of `<root>/asset_fixer.config.json`.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Log failing tile-maps and continue instead of aborting the run.
  #[arg(long)]
  keep_going: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .init();

  let cli = Cli::parse();
  let config = match &cli.config {
    Some(path) => ProjectConfig::load_from_path(path)
      .with_context(|| format!("failed to load config {}", path.display()))?,
    None => ProjectConfig::discover(&cli.root),
  };
  let layout = config.to_layout(&cli.root);
  let policy = if cli.keep_going {
    FailurePolicy::Isolate
  } else {
    config.failure_policy()
  };

  let report = AssetFixer::new(&layout)
    .with_failure_policy(policy)
    .run()
    .context("asset path fixing aborted")?;

  info!(
    visited = report.files_visited,
    written = report.files_written,
    skipped = report.files_skipped,
    rewritten = report.tilesets_rewritten,
    "tile-map rewrite finished"
  );

  if !report.failures.is_empty() {
    for failure in &report.failures {
      error!(
        path = %failure.path.display(),
        error = %failure.error,
        "tile-map could not be processed"
      );
    }
    bail!("{} tile-map file(s) could not be processed", report.failures.len());
  }

  Ok(())
}
