use serde::{Deserialize, Serialize};

use crate::error::{GeocodingError, Result};

/// Raw envelope returned by `/geocode/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GeocodeResponse {
    /// Map the `status` field onto a typed error, keeping results on `OK`.
    ///
    /// `query` is only used for error messages.
    pub fn into_results(self, query: &str) -> Result<Vec<GeocodeResult>> {
        let message = self
            .error_message
            .clone()
            .unwrap_or_else(|| query.to_string());

        match self.status.as_str() {
            "OK" if self.results.is_empty() => Err(GeocodingError::NoResults(query.to_string())),
            "OK" => Ok(self.results),
            "ZERO_RESULTS" => Err(GeocodingError::NoResults(query.to_string())),
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(GeocodingError::QuotaExceeded(message)),
            "REQUEST_DENIED" => Err(GeocodingError::RequestDenied(message)),
            "INVALID_REQUEST" => Err(GeocodingError::InvalidRequest(message)),
            other => Err(GeocodingError::Api {
                status: other.to_string(),
                message,
            }),
        }
    }
}

/// A single geocoding match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Geometry,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Location,
    #[serde(default)]
    pub location_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResult {
    pub fn latitude(&self) -> f64 {
        self.geometry.location.lat
    }

    pub fn longitude(&self) -> f64 {
        self.geometry.location.lng
    }

    fn component(&self, kind: &str) -> Option<&AddressComponent> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
    }

    /// Locality, falling back to postal town and then sublocality.
    pub fn city(&self) -> Option<&str> {
        ["locality", "postal_town", "sublocality", "administrative_area_level_3"]
            .iter()
            .find_map(|kind| self.component(kind))
            .map(|c| c.long_name.as_str())
    }

    /// Short state / province code (e.g. `MN`, `ON`).
    pub fn state_code(&self) -> Option<&str> {
        self.component("administrative_area_level_1")
            .map(|c| c.short_name.as_str())
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.component("postal_code").map(|c| c.long_name.as_str())
    }

    /// ISO country code (e.g. `US`).
    pub fn country_code(&self) -> Option<&str> {
        self.component("country").map(|c| c.short_name.as_str())
    }
}
