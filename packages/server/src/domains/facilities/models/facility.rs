use anyhow::Result;
use chrono::{DateTime, Utc};
use facility_filters::{Filterable, LatLng};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{CompanyId, FacilityId, RecordStatus};

/// Columns of `facilities`, aliased `f`. `geog` is derived and never read back.
pub(crate) const FACILITY_COLUMNS: &str = "f.id, f.company_id, f.name, f.address, f.city, f.state, \
     f.zip_code, f.latitude, f.longitude, f.tags, f.status, f.created_at, f.updated_at";

/// Facility model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Facility {
    pub id: FacilityId,
    pub company_id: CompanyId,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: Vec<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Facility joined with its owning company
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct FacilityRow {
    #[sqlx(flatten)]
    pub facility: Facility,
    pub company_name: String,
    pub company_legend_color: String,
    /// Only set by searches with a center point
    pub distance_miles: Option<f64>,
}

/// Fields written on insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityFields {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: Vec<String>,
}

fn joined_select() -> String {
    format!(
        "SELECT {}, c.name AS company_name, c.legend_color AS company_legend_color, \
         NULL::DOUBLE PRECISION AS distance_miles
         FROM facilities f
         JOIN companies c ON c.id = f.company_id
         WHERE f.status = 'active' AND c.status = 'active'",
        FACILITY_COLUMNS
    )
}

impl Facility {
    /// Active facility of an active company, with company fields
    pub async fn find_by_id(id: FacilityId, pool: &PgPool) -> Result<Option<FacilityRow>> {
        let sql = format!("{} AND f.id = $1", joined_select());
        sqlx::query_as::<_, FacilityRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All active facilities, optionally restricted to one company
    pub async fn find_active(
        company_id: Option<CompanyId>,
        pool: &PgPool,
    ) -> Result<Vec<FacilityRow>> {
        let sql = format!(
            "{} AND ($1::UUID IS NULL OR f.company_id = $1)
             ORDER BY LOWER(c.name), LOWER(f.name), f.id",
            joined_select()
        );
        sqlx::query_as::<_, FacilityRow>(&sql)
            .bind(company_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Nearest active facility of the same company within `radius_meters`
    pub async fn find_duplicate(
        company_id: CompanyId,
        point: LatLng,
        radius_meters: f64,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let sql = format!(
            "SELECT {cols}
             FROM facilities f
             WHERE f.company_id = $1
               AND f.status = 'active'
               AND ST_DWithin(f.geog, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography, $4)
             ORDER BY ST_Distance(f.geog, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography)
             LIMIT 1",
            cols = FACILITY_COLUMNS
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(company_id)
            .bind(point.longitude)
            .bind(point.latitude)
            .bind(radius_meters)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(
        company_id: CompanyId,
        fields: &FacilityFields,
        pool: &PgPool,
    ) -> Result<Self> {
        let sql = format!(
            "INSERT INTO facilities AS f
                (id, company_id, name, address, city, state, zip_code, latitude, longitude, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            FACILITY_COLUMNS
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(FacilityId::new())
            .bind(company_id)
            .bind(&fields.name)
            .bind(&fields.address)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(&fields.zip_code)
            .bind(fields.latitude)
            .bind(fields.longitude)
            .bind(&fields.tags)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Overwrite every editable field of an active facility
    pub async fn update(
        id: FacilityId,
        company_id: CompanyId,
        fields: &FacilityFields,
        pool: &PgPool,
    ) -> Result<Self> {
        let sql = format!(
            "UPDATE facilities AS f
             SET company_id = $2, name = $3, address = $4, city = $5, state = $6,
                 zip_code = $7, latitude = $8, longitude = $9, tags = $10,
                 updated_at = NOW()
             WHERE f.id = $1 AND f.status = 'active'
             RETURNING {}",
            FACILITY_COLUMNS
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(company_id)
            .bind(&fields.name)
            .bind(&fields.address)
            .bind(&fields.city)
            .bind(&fields.state)
            .bind(&fields.zip_code)
            .bind(fields.latitude)
            .bind(fields.longitude)
            .bind(&fields.tags)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Returns false when no active facility had this id.
    pub async fn soft_delete(id: FacilityId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE facilities SET status = 'deleted', updated_at = NOW()
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub fn location(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn fields(&self) -> FacilityFields {
        FacilityFields {
            name: self.name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            tags: self.tags.clone(),
        }
    }
}

impl Filterable for FacilityRow {
    fn company_id(&self) -> Uuid {
        self.facility.company_id.into_uuid()
    }

    fn name(&self) -> &str {
        &self.facility.name
    }

    fn company_name(&self) -> &str {
        &self.company_name
    }

    fn address(&self) -> &str {
        &self.facility.address
    }

    fn state(&self) -> &str {
        self.facility.state.as_deref().unwrap_or_default()
    }

    fn location(&self) -> Option<LatLng> {
        Some(self.facility.location())
    }

    fn tags(&self) -> &[String] {
        &self.facility.tags
    }

    fn city(&self) -> Option<String> {
        self.facility
            .city
            .clone()
            .or_else(|| facility_filters::derive_city(&self.facility.address))
    }
}
