//! Great-circle distance and unit conversions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Mean Earth radius used by the Haversine formula, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Kilometers per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Meters per statute mile (used when handing radii to PostGIS).
pub const METERS_PER_MILE: f64 = 1609.34;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point, rejecting out-of-range or non-finite values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(FilterError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// GeoJSON ordering: `[longitude, latitude]`.
    pub fn to_geojson_coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// |lat| ≤ 90 and |lng| ≤ 180, both finite.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// Haversine distance between two points, in miles.
pub fn haversine_miles(a: LatLng, b: LatLng) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1.0 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_MILES * c
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// Unit a proximity radius is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Miles => "miles",
            Self::Kilometers => "kilometers",
        }
    }

    /// Convert a value in this unit to miles.
    pub fn to_miles(&self, value: f64) -> f64 {
        match self {
            Self::Miles => value,
            Self::Kilometers => km_to_miles(value),
        }
    }

    /// Convert a value in this unit to meters.
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            Self::Miles => value * METERS_PER_MILE,
            Self::Kilometers => value * 1000.0,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "miles" | "mile" | "mi" => Ok(Self::Miles),
            "kilometers" | "kilometer" | "km" => Ok(Self::Kilometers),
            other => Err(FilterError::InvalidUnit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // Minneapolis to St. Paul (≈9 miles)
        let minneapolis = LatLng::new(44.98, -93.27);
        let st_paul = LatLng::new(44.95, -93.09);

        let distance = haversine_miles(minneapolis, st_paul);
        assert!(distance > 8.5 && distance < 9.5, "got {}", distance);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let p = LatLng::new(40.7128, -74.0060);
        assert_eq!(haversine_miles(p, p), 0.0);
    }

    #[test]
    fn test_haversine_antipodal_is_half_circumference() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 180.0);
        let expected = std::f64::consts::PI * EARTH_RADIUS_MILES;
        assert!((haversine_miles(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((miles_to_km(1.0) - 1.60934).abs() < 1e-12);
        assert!((km_to_miles(1.60934) - 1.0).abs() < 1e-12);
        assert_eq!(DistanceUnit::Miles.to_meters(1.0), 1609.34);
        assert_eq!(DistanceUnit::Kilometers.to_meters(2.5), 2500.0);
        assert_eq!(DistanceUnit::Miles.to_miles(5.0), 5.0);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(is_valid_coordinate(90.0, 180.0));
        assert!(is_valid_coordinate(-90.0, -180.0));
        assert!(!is_valid_coordinate(90.1, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.5));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
        assert!(LatLng::checked(91.0, 0.0).is_err());
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("miles".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert_eq!("KM".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert!("furlongs".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_geojson_order() {
        let p = LatLng::new(44.98, -93.27);
        assert_eq!(p.to_geojson_coordinates(), [-93.27, 44.98]);
    }
}
