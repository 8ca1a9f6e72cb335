use anyhow::Result;
use sqlx::PgPool;

use crate::common::{CompanyId, NotFoundError};
use crate::domains::companies::data::CompanyData;
use crate::domains::companies::models::Company;

/// Active company or `NotFoundError`.
pub async fn load_active_company(id: CompanyId, pool: &PgPool) -> Result<Company> {
    Company::find_by_id_optional(id, pool)
        .await?
        .ok_or_else(|| NotFoundError("Company").into())
}

/// All active companies with facility counts, ordered by name.
pub async fn list_companies(pool: &PgPool) -> Result<Vec<CompanyData>> {
    let rows = Company::find_active_with_counts(pool).await?;
    Ok(rows.into_iter().map(CompanyData::from).collect())
}

pub async fn get_company(id: CompanyId, pool: &PgPool) -> Result<CompanyData> {
    Ok(load_active_company(id, pool).await?.into())
}
