//! Server dependencies shared by handlers, actions and the import CLI.
//!
//! External services sit behind traits so tests can swap them for mocks.

use anyhow::Result;
use async_trait::async_trait;
use google_geocoding::{GeocodeResult, GeocodingClient};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::IngestSettings;
use crate::kernel::{BaseGeocoder, GeocodedPlace};

// =============================================================================
// GeocodingClient Adapter (implements BaseGeocoder trait)
// =============================================================================

/// Wrapper around the Google client that implements BaseGeocoder
pub struct GoogleGeocoderAdapter(pub GeocodingClient);

impl GoogleGeocoderAdapter {
    pub fn new(client: GeocodingClient) -> Self {
        Self(client)
    }
}

impl From<GeocodeResult> for GeocodedPlace {
    fn from(result: GeocodeResult) -> Self {
        Self {
            latitude: result.latitude(),
            longitude: result.longitude(),
            city: result.city().map(str::to_string),
            state: result.state_code().map(str::to_string),
            zip_code: result.postal_code().map(str::to_string),
            formatted_address: result.formatted_address,
        }
    }
}

#[async_trait]
impl BaseGeocoder for GoogleGeocoderAdapter {
    async fn geocode(&self, address: &str) -> Result<GeocodedPlace> {
        Ok(self.0.geocode(address).await?.into())
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodedPlace> {
        Ok(self.0.reverse_geocode(latitude, longitude).await?.into())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub geocoder: Arc<dyn BaseGeocoder>,
    pub ingest: IngestSettings,
}

impl ServerDeps {
    pub fn new(db_pool: PgPool, geocoder: Arc<dyn BaseGeocoder>, ingest: IngestSettings) -> Self {
        Self {
            db_pool,
            geocoder,
            ingest,
        }
    }
}
