// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseGeocoder)

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A resolved location, from either direction of geocoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

// =============================================================================
// Geocoding Trait (Infrastructure)
// =============================================================================

/// Errors should carry a `google_geocoding::GeocodingError` where one applies
/// so the HTTP layer can map them to status codes.
#[async_trait]
pub trait BaseGeocoder: Send + Sync {
    /// Address → coordinates
    async fn geocode(&self, address: &str) -> Result<GeocodedPlace>;

    /// Coordinates → address
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodedPlace>;
}
