//! polimoney-master - Master data maintenance tool
//!
//! Subcommands:
//! - `districts`: rebuild the electoral district master table
//! - `municipalities <CSV>`: load the municipality registry
//! - `status`: show freshness markers and row counts
//!
//! Only setup failures (configuration, database open) end the process with
//! an error. A district rebuild always exits successfully; its report tells
//! whether the table is complete.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polimoney_common::config::{load_default_config, load_toml_config, resolve_database_path};
use polimoney_common::db::init_database;
use polimoney_master::import::import_municipalities;
use polimoney_master::status::load_status;
use polimoney_master::{Reconciler, SqliteMasterStore};
use std::path::PathBuf;
use tracing::{info, warn};

/// Command-line arguments for polimoney-master
#[derive(Parser, Debug)]
#[command(name = "polimoney-master")]
#[command(about = "Electoral district and municipality master data for Polimoney")]
#[command(version)]
struct Args {
    /// SQLite database file (overrides POLIMONEY_DATABASE and config.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rows per municipality read
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Rows per insert call
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wipe and rebuild the districts table
    Districts {
        /// Write the reconciliation report as JSON
        #[arg(long, value_name = "FILE")]
        report_json: Option<PathBuf>,
    },
    /// Import the municipality code list from a CSV file
    Municipalities {
        /// CSV with columns code, prefecture_name, city_name, prefecture_name_kana, city_name_kana
        csv: PathBuf,
    },
    /// Show when master tables were last rebuilt and their row counts
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting polimoney-master v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => load_default_config(),
    };

    let settings = config
        .master
        .with_overrides(args.page_size, args.batch_size);
    settings.validate()?;

    let db_path = resolve_database_path(args.database.as_deref(), &config)?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match args.command {
        Command::Districts { report_json } => {
            let store = SqliteMasterStore::new(pool);
            let report = Reconciler::new(&store, settings).run().await;

            if let Some(path) = report_json {
                // Report write failure is not fatal
                let written = serde_json::to_vec_pretty(&report)
                    .map_err(anyhow::Error::from)
                    .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
                match written {
                    Ok(()) => info!("Report written to {}", path.display()),
                    Err(e) => warn!("Failed to write report {}: {}", path.display(), e),
                }
            }
        }
        Command::Municipalities { csv } => {
            let summary = import_municipalities(&pool, &csv, settings.batch_size)
                .await
                .context("Municipality import failed")?;
            info!(
                "Imported {} of {} rows ({} total)",
                summary.inserted, summary.submitted, summary.total
            );
        }
        Command::Status => {
            let status = load_status(&pool).await?;
            info!(
                "districts: last rebuilt {}",
                status.districts_updated_at.as_deref().unwrap_or("never")
            );
            for count in &status.district_counts {
                info!("  - {}: {}", count.label(), count.row_count);
            }
            info!("  total: {}", status.district_total());
            info!(
                "municipalities: last imported {}, {} active",
                status.municipalities_updated_at.as_deref().unwrap_or("never"),
                status.active_municipalities
            );
        }
    }

    Ok(())
}
