//! Pure Google Geocoding REST API client.
//!
//! Forward (address → coordinates) and reverse (coordinates → address)
//! lookups against `maps.googleapis.com`, with Google's status codes mapped
//! onto [`GeocodingError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use google_geocoding::GeocodingClient;
//!
//! let client = GeocodingClient::from_env()?;
//!
//! let hit = client.geocode("100 Main St, Minneapolis, MN").await?;
//! println!("{} → ({}, {})", hit.formatted_address, hit.latitude(), hit.longitude());
//!
//! let place = client.reverse_geocode(44.98, -93.27).await?;
//! println!("{:?}, {:?}", place.city(), place.state_code());
//! ```

pub mod error;
pub mod types;

pub use error::{GeocodingError, Result};
pub use types::{AddressComponent, GeocodeResponse, GeocodeResult, Geometry, Location};

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Google Geocoding API client.
#[derive(Clone)]
pub struct GeocodingClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeocodingClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create from environment variable `GOOGLE_MAPS_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .map_err(|_| GeocodingError::Config("GOOGLE_MAPS_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Point at a different endpoint (proxies, local fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout. Defaults to 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Geocode a free-form address, returning the best match.
    #[instrument(skip(self))]
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::InvalidRequest("address is empty".into()));
        }

        debug!("Geocoding address");
        let results = self
            .request(&[("address", address)], address)
            .await?;
        first(results, address)
    }

    /// Reverse-geocode a coordinate pair, returning the most specific address.
    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodeResult> {
        let latlng = format!("{},{}", latitude, longitude);

        debug!("Reverse geocoding coordinates");
        let results = self.request(&[("latlng", latlng.as_str())], &latlng).await?;
        first(results, &latlng)
    }

    async fn request(&self, params: &[(&str, &str)], query: &str) -> Result<Vec<GeocodeResult>> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Geocoding API request failed");
                GeocodingError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Geocoding API returned non-success status");
            return Err(GeocodingError::Api {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let envelope: GeocodeResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse geocoding response");
            GeocodingError::Parse(e.to_string())
        })?;

        envelope.into_results(query).inspect_err(|e| match e {
            GeocodingError::NoResults(_) => warn!("Location not found by geocoding API"),
            other => error!(error = %other, "Geocoding API rejected request"),
        })
    }
}

fn first(results: Vec<GeocodeResult>, query: &str) -> Result<GeocodeResult> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodingError::NoResults(query.to_string()))
}
