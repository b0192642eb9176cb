use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use linkumkm_core::orphans::CleanupMode;

/// Remove uploaded images that no database row references.
///
/// Without `--delete` the run is a dry run that only reports what would be
/// removed.
#[derive(Debug, Parser)]
#[command(name = "linkumkm-janitor", version, about)]
pub struct Cli {
    /// Run one pass immediately and exit.
    #[arg(long, conflicts_with = "schedule")]
    pub now: bool,

    /// Keep running, one pass every `--hours`.
    #[arg(long)]
    pub schedule: bool,

    /// Actually delete orphaned files.
    #[arg(long)]
    pub delete: bool,

    /// Interval between scheduled passes.
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..=720))]
    pub hours: u64,

    /// Upload root to scan.
    #[arg(long, env = "UPLOAD_DIR", default_value = "public/uploads")]
    pub upload_dir: PathBuf,

    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

impl Cli {
    pub fn mode(&self) -> CleanupMode {
        if self.delete {
            CleanupMode::Delete
        } else {
            CleanupMode::DryRun
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.hours * 3600)
    }
}
