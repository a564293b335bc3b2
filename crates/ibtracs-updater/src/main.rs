//! ibtracs-updater binary.
//!
//! Reads `updater.toml` (or the path given with `--config`), then runs one
//! incremental update against the configured SQLite store.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use ibtracs_updater::UpdaterConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Incremental IBTrACS track updater")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "updater.toml")]
  config: PathBuf,

  /// Read this CSV instead of downloading the archive.
  #[arg(long)]
  csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = UpdaterConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let report = ibtracs_updater::run(&config, cli.csv.as_deref())
    .await
    .context("update failed")?;

  println!(
    "{:?}: {} rows read, {} rejected, {} upserted across {} storms",
    report.mode, report.rows_read, report.rows_rejected, report.upserted, report.storms_touched
  );

  Ok(())
}
