//! Turning user-supplied address / coordinates into a stored location.

use anyhow::Result;
use facility_filters::{derive_city, parse_tag_list, LatLng};
use tracing::debug;

use crate::common::ValidationError;
use crate::kernel::BaseGeocoder;

/// Optional location details supplied alongside the address.
#[derive(Debug, Clone, Default)]
pub struct LocationHints {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub address: String,
    pub point: LatLng,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Both coordinates or neither; a lone latitude or longitude is an error.
pub fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<LatLng>> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => {
            let point = LatLng::checked(lat, lng).map_err(|e| {
                ValidationError::field("coordinates", e.to_string())
            })?;
            Ok(Some(point))
        }
        (None, None) => Ok(None),
        _ => Err(ValidationError::field(
            "coordinates",
            "latitude and longitude must be given together",
        )
        .into()),
    }
}

/// Resolve a location.
///
/// - address only: forward geocode for the point
/// - coordinates only: reverse geocode for the address
/// - both: stored as given, no geocoding call
///
/// Explicit hints win over geocoded city/state/zip. City falls back to the
/// one derived from the address.
pub async fn resolve_location(
    address: Option<&str>,
    point: Option<LatLng>,
    hints: LocationHints,
    geocoder: &dyn BaseGeocoder,
) -> Result<ResolvedLocation> {
    let address = non_blank(address);
    let hint_city = non_blank(hints.city.as_deref());
    let hint_state = non_blank(hints.state.as_deref());
    let hint_zip = non_blank(hints.zip_code.as_deref());

    let resolved = match (address, point) {
        (Some(address), Some(point)) => ResolvedLocation {
            city: hint_city.or_else(|| derive_city(&address)),
            state: hint_state,
            zip_code: hint_zip,
            address,
            point,
        },
        (Some(address), None) => {
            let place = geocoder.geocode(&address).await?;
            debug!(address = %address, lat = place.latitude, lng = place.longitude, "Geocoded address");
            ResolvedLocation {
                point: LatLng::new(place.latitude, place.longitude),
                city: hint_city
                    .or(place.city)
                    .or_else(|| derive_city(&address)),
                state: hint_state.or(place.state),
                zip_code: hint_zip.or(place.zip_code),
                address,
            }
        }
        (None, Some(point)) => {
            let place = geocoder
                .reverse_geocode(point.latitude, point.longitude)
                .await?;
            debug!(address = %place.formatted_address, "Reverse geocoded coordinates");
            let address = place.formatted_address;
            ResolvedLocation {
                city: hint_city
                    .or(place.city)
                    .or_else(|| derive_city(&address)),
                state: hint_state.or(place.state),
                zip_code: hint_zip.or(place.zip_code),
                address,
                point,
            }
        }
        (None, None) => {
            return Err(ValidationError::field(
                "address",
                "an address or both latitude and longitude are required",
            )
            .into())
        }
    };

    Ok(resolved)
}

/// Name for a facility that was not given one: "City, ST", then either part,
/// then the address itself.
pub fn synthesize_name(location: &ResolvedLocation) -> String {
    match (location.city.as_deref(), location.state.as_deref()) {
        (Some(city), Some(state)) => format!("{}, {}", city, state),
        (Some(city), None) => city.to_string(),
        (None, Some(state)) => state.to_string(),
        (None, None) => location.address.clone(),
    }
}

/// Trimmed, non-empty tags with case-insensitive duplicates dropped.
pub fn clean_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags.iter().flat_map(|t| parse_tag_list(t.as_ref())) {
        let collapsed = tag.split_whitespace().collect::<Vec<_>>().join(" ");
        if !out.iter().any(|t| t.eq_ignore_ascii_case(&collapsed)) {
            out.push(collapsed);
        }
    }
    out
}
