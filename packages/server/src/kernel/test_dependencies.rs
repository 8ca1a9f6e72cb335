// Mock implementations for testing
//
// Lives in the library (not behind cfg(test)) so integration tests and the
// import CLI's dry runs can inject it into ServerDeps.

use anyhow::Result;
use async_trait::async_trait;
use google_geocoding::GeocodingError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseGeocoder, GeocodedPlace};

/// A geocoding call captured by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeCall {
    Forward(String),
    Reverse { latitude: f64, longitude: f64 },
}

enum Canned {
    Place(GeocodedPlace),
    Fail(String),
}

/// Geocoder that answers from a table and records every call.
///
/// Unknown addresses fail with `GeocodingError::NoResults`. Reverse lookups
/// echo the coordinates back with the configured city/state (if any).
#[derive(Clone, Default)]
pub struct MockGeocoder {
    addresses: Arc<Mutex<HashMap<String, Canned>>>,
    reverse: Arc<Mutex<Option<(String, String)>>>,
    calls: Arc<Mutex<Vec<GeocodeCall>>>,
}

fn key(address: &str) -> String {
    address.trim().to_lowercase()
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `address` with the given point; city/state are derived from the address.
    pub fn with_address(self, address: &str, latitude: f64, longitude: f64) -> Self {
        let parts: Vec<&str> = address.split(',').map(str::trim).collect();
        let city = facility_filters::derive_city(address);
        let (state, zip_code) = parts
            .last()
            .map(|last| {
                let mut it = last.split_whitespace();
                (it.next().map(str::to_string), it.next().map(str::to_string))
            })
            .unwrap_or((None, None));

        let place = GeocodedPlace {
            latitude,
            longitude,
            formatted_address: address.to_string(),
            city,
            state,
            zip_code,
        };
        self.with_place(address, place)
    }

    pub fn with_place(self, address: &str, place: GeocodedPlace) -> Self {
        self.addresses
            .lock()
            .unwrap()
            .insert(key(address), Canned::Place(place));
        self
    }

    /// Make `address` fail with an API-level error.
    pub fn with_failure(self, address: &str, message: &str) -> Self {
        self.addresses
            .lock()
            .unwrap()
            .insert(key(address), Canned::Fail(message.to_string()));
        self
    }

    /// City and state returned by reverse lookups.
    pub fn with_reverse_place(self, city: &str, state: &str) -> Self {
        *self.reverse.lock().unwrap() = Some((city.to_string(), state.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<GeocodeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn was_geocoded(&self, address: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| matches!(c, GeocodeCall::Forward(a) if key(a) == key(address)))
    }
}

#[async_trait]
impl BaseGeocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedPlace> {
        self.calls
            .lock()
            .unwrap()
            .push(GeocodeCall::Forward(address.to_string()));

        match self.addresses.lock().unwrap().get(&key(address)) {
            Some(Canned::Place(place)) => Ok(place.clone()),
            Some(Canned::Fail(message)) => Err(GeocodingError::Api {
                status: "UNKNOWN_ERROR".into(),
                message: message.clone(),
            }
            .into()),
            None => Err(GeocodingError::NoResults(address.to_string()).into()),
        }
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<GeocodedPlace> {
        self.calls
            .lock()
            .unwrap()
            .push(GeocodeCall::Reverse {
                latitude,
                longitude,
            });

        let (city, state) = match self.reverse.lock().unwrap().clone() {
            Some((city, state)) => (Some(city), Some(state)),
            None => (None, None),
        };

        let formatted_address = match (&city, &state) {
            (Some(city), Some(state)) => format!("{:.5}, {:.5}, {}, {}", latitude, longitude, city, state),
            _ => format!("{:.5}, {:.5}", latitude, longitude),
        };

        Ok(GeocodedPlace {
            latitude,
            longitude,
            formatted_address,
            city,
            state,
            zip_code: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_answers_from_table_and_records_calls() {
        let mock = MockGeocoder::new().with_address("100 Main St, Minneapolis, MN 55401", 44.98, -93.27);

        let place = mock.geocode(" 100 main st, minneapolis, mn 55401").await.unwrap();
        assert_eq!(place.city.as_deref(), Some("Minneapolis"));
        assert_eq!(place.state.as_deref(), Some("MN"));
        assert_eq!(place.zip_code.as_deref(), Some("55401"));

        let err = mock.geocode("nowhere").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeocodingError>(),
            Some(GeocodingError::NoResults(_))
        ));

        assert_eq!(mock.call_count(), 2);
        assert!(mock.was_geocoded("100 Main St, Minneapolis, MN 55401"));
    }

    #[tokio::test]
    async fn test_mock_reverse_echoes_coordinates() {
        let mock = MockGeocoder::new().with_reverse_place("Duluth", "MN");
        let place = mock.reverse_geocode(46.78, -92.1).await.unwrap();
        assert_eq!(place.latitude, 46.78);
        assert_eq!(place.city.as_deref(), Some("Duluth"));
        assert_eq!(
            mock.calls(),
            vec![GeocodeCall::Reverse {
                latitude: 46.78,
                longitude: -92.1
            }]
        );
    }
}
