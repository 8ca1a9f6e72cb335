use serde::{Deserialize, Serialize};

use crate::common::RecordStatus;
use crate::domains::companies::CompanySummary;
use crate::domains::facilities::models::FacilityRow;

/// GeoJSON point, coordinates in `[longitude, latitude]` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Facility as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityData {
    pub id: String,
    pub company: CompanySummary,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub location: GeoPoint,
    pub tags: Vec<String>,
    pub status: RecordStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl From<FacilityRow> for FacilityData {
    fn from(row: FacilityRow) -> Self {
        let f = row.facility;
        Self {
            id: f.id.to_string(),
            company: CompanySummary {
                id: f.company_id.to_string(),
                name: row.company_name,
                legend_color: row.company_legend_color,
            },
            name: f.name,
            address: f.address,
            city: f.city,
            state: f.state,
            zip_code: f.zip_code,
            location: GeoPoint::new(f.longitude, f.latitude),
            tags: f.tags,
            status: f.status,
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
            distance_miles: row.distance_miles,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityInput {
    pub company_id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFacilityInput {
    pub company_id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tags: Option<Vec<String>>,
}
