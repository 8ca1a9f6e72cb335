//! CLI for importing a facility CSV without going through HTTP
//!
//! Runs the same pipeline as `POST /api/upload/csv` and prints the JSON report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use facility_core::config::Config;
use facility_core::domains::ingestion::import_csv;
use facility_core::kernel::{GoogleGeocoderAdapter, ServerDeps};
use google_geocoding::GeocodingClient;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "import_csv")]
#[command(about = "Import companies and facilities from a CSV file")]
struct Cli {
    /// Path to the CSV file
    file: PathBuf,

    /// Pause between geocoding calls, overriding GEOCODE_DELAY_MS
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Size limit in bytes, overriding MAX_UPLOAD_BYTES
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,facility_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let mut settings = config.ingest_settings();
    if let Some(delay_ms) = cli.delay_ms {
        settings.geocode_delay = Duration::from_millis(delay_ms);
    }
    if let Some(max_bytes) = cli.max_bytes {
        settings.max_upload_bytes = max_bytes;
    }

    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let file_name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let geocoder = GeocodingClient::new(config.google_maps_api_key.clone());
    let deps = ServerDeps::new(pool, Arc::new(GoogleGeocoderAdapter::new(geocoder)), settings);

    let report = import_csv(&file_name, &bytes, &deps).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}
