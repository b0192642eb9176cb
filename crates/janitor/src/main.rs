use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linkumkm_janitor::cleanup::{log_report, reference_prefixes_from_env, run_pass};
use linkumkm_janitor::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("linkumkm_janitor=info,info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let mode = cli.mode();
    let prefixes = reference_prefixes_from_env();
    let pool = linkumkm_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    if !cli.schedule {
        if !cli.now {
            tracing::info!("No --now or --schedule given; running once. Use --schedule --hours=N to repeat");
        }
        let report = run_pass(&pool, &cli.upload_dir, &prefixes, mode).await?;
        log_report(&report, mode);
        return Ok(());
    }

    tracing::info!(hours = cli.hours, ?mode, upload_dir = %cli.upload_dir.display(), "Scheduled cleanup started");
    let mut interval = tokio::time::interval(cli.interval());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                // A failed pass is logged; the next tick tries again.
                match run_pass(&pool, &cli.upload_dir, &prefixes, mode).await {
                    Ok(report) => log_report(&report, mode),
                    Err(e) => tracing::error!(error = ?e, "Cleanup pass failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, stopping scheduled cleanup");
                break;
            }
        }
    }
    Ok(())
}
