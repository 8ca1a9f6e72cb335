//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use facility_core::common::CompanyId;
use facility_core::domains::companies::Company;
use facility_core::domains::facilities::{Facility, FacilityFields};
use sqlx::PgPool;
use uuid::Uuid;

/// A company name no other test will use.
pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().simple().to_string()[..10])
}

pub async fn create_test_company(pool: &PgPool, prefix: &str, color: &str) -> Result<Company> {
    Company::create(&unique_name(prefix), color, pool).await
}

/// Facility fields with sensible defaults; override what the test cares about.
pub fn facility_fields(name: &str, latitude: f64, longitude: f64) -> FacilityFields {
    FacilityFields {
        name: name.to_string(),
        address: format!("{} Main St, Minneapolis, MN 55401", name.len()),
        city: Some("Minneapolis".to_string()),
        state: Some("MN".to_string()),
        zip_code: Some("55401".to_string()),
        latitude,
        longitude,
        tags: Vec::new(),
    }
}

pub async fn create_test_facility(
    pool: &PgPool,
    company_id: CompanyId,
    fields: FacilityFields,
) -> Result<Facility> {
    Facility::create(company_id, &fields, pool).await
}

/// Active facilities of one company, straight from the table.
pub async fn count_active_facilities(pool: &PgPool, company_id: CompanyId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM facilities WHERE company_id = $1 AND status = 'active'",
    )
    .bind(company_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
