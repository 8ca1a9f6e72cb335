//! Per-row validation. A failing row becomes a skip reason, never an error
//! for the batch.

use facility_filters::LatLng;

use super::csv_file::RawRow;
use crate::common::{validate_company_name, validate_legend_color};
use crate::domains::facilities::actions::{clean_tags, LocationHints};

/// A row that passed validation and is ready for geocoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRow {
    pub row: usize,
    pub company_name: String,
    pub legend_color: String,
    pub address: Option<String>,
    pub point: Option<LatLng>,
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl ValidRow {
    pub fn hints(&self) -> LocationHints {
        LocationHints {
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
        }
    }

    /// Whether resolving this row's location calls the geocoder.
    pub fn needs_geocoding(&self) -> bool {
        self.address.is_none() || self.point.is_none()
    }
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{}: invalid number '{}'", name, raw))
}

pub fn validate_row(raw: RawRow) -> Result<ValidRow, String> {
    let company_name =
        validate_company_name(raw.company_name.as_deref().unwrap_or_default())
            .map_err(|e| e.to_string())?;
    let legend_color = validate_legend_color(raw.legend_color.as_deref().unwrap_or_default())
        .map_err(|e| e.to_string())?;

    let point = match (raw.latitude.as_deref(), raw.longitude.as_deref()) {
        (Some(lat), Some(lng)) => {
            let latitude = parse_coordinate("latitude", lat)?;
            let longitude = parse_coordinate("longitude", lng)?;
            let point = LatLng::checked(latitude, longitude).map_err(|e| e.to_string())?;
            Some(point)
        }
        (Some(_), None) if raw.address.is_none() => {
            return Err("longitude: is required when latitude is given".into())
        }
        (None, Some(_)) if raw.address.is_none() => {
            return Err("latitude: is required when longitude is given".into())
        }
        _ => None,
    };

    if raw.address.is_none() && point.is_none() {
        return Err("address: an address or both latitude and longitude are required".into());
    }

    Ok(ValidRow {
        row: raw.row,
        company_name,
        legend_color,
        address: raw.address,
        point,
        name: raw.name,
        tags: clean_tags(&raw.tags),
        city: raw.city,
        state: raw.state,
        zip_code: raw.zip_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(company: Option<&str>, color: Option<&str>) -> RawRow {
        RawRow {
            row: 2,
            company_name: company.map(str::to_string),
            legend_color: color.map(str::to_string),
            address: Some("100 Main St, Minneapolis, MN 55401".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_company_name() {
        let reason = validate_row(raw(None, Some("#FF5733"))).unwrap_err();
        assert!(reason.contains("company_name"), "{reason}");
    }

    #[test]
    fn test_named_color_rejected_citing_legend_color() {
        let reason = validate_row(raw(Some("Acme"), Some("red"))).unwrap_err();
        assert!(reason.contains("legend_color"), "{reason}");
        assert!(validate_row(raw(Some("Acme"), Some("#FF5733"))).is_ok());
    }

    #[test]
    fn test_coordinates_parsed_and_range_checked() {
        let mut row = raw(Some("Acme"), Some("#abc"));
        row.address = None;
        row.latitude = Some("44.98".into());
        row.longitude = Some("-93.27".into());
        let valid = validate_row(row.clone()).unwrap();
        assert_eq!(valid.point, Some(LatLng::new(44.98, -93.27)));
        assert!(valid.needs_geocoding());

        row.latitude = Some("north".into());
        assert!(validate_row(row.clone()).unwrap_err().starts_with("latitude"));

        row.latitude = Some("95".into());
        assert!(validate_row(row.clone()).is_err());

        row.latitude = None;
        assert!(validate_row(row).unwrap_err().starts_with("latitude"));
    }

    #[test]
    fn test_address_with_coordinates_needs_no_geocoding() {
        let mut row = raw(Some("Acme"), Some("#abc"));
        row.latitude = Some("44.98".into());
        row.longitude = Some("-93.27".into());
        assert!(!validate_row(row).unwrap().needs_geocoding());
    }
}
