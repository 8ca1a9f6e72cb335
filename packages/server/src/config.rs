use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub google_maps_api_key: String,
    /// Pause between consecutive geocoding calls during CSV import
    pub geocode_delay_ms: u64,
    pub max_upload_bytes: usize,
    /// Same-company facilities closer than this are treated as one
    pub duplicate_radius_meters: f64,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .context("GOOGLE_MAPS_API_KEY must be set")?,
            geocode_delay_ms: env::var("GEOCODE_DELAY_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("GEOCODE_DELAY_MS must be a valid number")?,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
            duplicate_radius_meters: env::var("DUPLICATE_RADIUS_METERS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("DUPLICATE_RADIUS_METERS must be a valid number")?,
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    pub fn ingest_settings(&self) -> IngestSettings {
        IngestSettings {
            geocode_delay: Duration::from_millis(self.geocode_delay_ms),
            max_upload_bytes: self.max_upload_bytes,
            duplicate_radius_meters: self.duplicate_radius_meters,
        }
    }
}

/// Knobs for the CSV import pipeline.
#[derive(Debug, Clone, Copy)]
pub struct IngestSettings {
    pub geocode_delay: Duration,
    pub max_upload_bytes: usize,
    pub duplicate_radius_meters: f64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            geocode_delay: Duration::from_millis(100),
            max_upload_bytes: 10 * 1024 * 1024,
            duplicate_radius_meters: 100.0,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
