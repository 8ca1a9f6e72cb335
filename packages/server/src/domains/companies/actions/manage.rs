use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use super::queries::load_active_company;
use crate::common::{
    validate_company_name, validate_legend_color, CompanyId, NotFoundError, ValidationError,
};
use crate::domains::companies::data::{CompanyData, CreateCompanyInput, UpdateCompanyInput};
use crate::domains::companies::models::Company;

async fn ensure_name_available(
    name: &str,
    except: Option<CompanyId>,
    pool: &PgPool,
) -> Result<()> {
    if let Some(existing) = Company::find_active_by_name(name, pool).await? {
        if Some(existing.id) != except {
            return Err(ValidationError::field(
                "name",
                format!("duplicate: a company named '{}' already exists", existing.name),
            )
            .into());
        }
    }
    Ok(())
}

pub async fn create_company(input: CreateCompanyInput, pool: &PgPool) -> Result<CompanyData> {
    let name = validate_company_name(&input.name)?;
    let legend_color = validate_legend_color(input.legend_color.as_deref().unwrap_or_default())?;

    ensure_name_available(&name, None, pool).await?;

    let company = Company::create(&name, &legend_color, pool).await?;
    info!(company_id = %company.id, company = %company.name, "Company created");
    Ok(company.into())
}

/// Change name and/or legend color. Omitted fields keep their value.
pub async fn update_company(
    id: CompanyId,
    input: UpdateCompanyInput,
    pool: &PgPool,
) -> Result<CompanyData> {
    let name = input.name.as_deref().map(validate_company_name).transpose()?;
    let legend_color = input
        .legend_color
        .as_deref()
        .map(validate_legend_color)
        .transpose()?;

    load_active_company(id, pool).await?;
    if let Some(name) = &name {
        ensure_name_available(name, Some(id), pool).await?;
    }

    let company = Company::update(id, name.as_deref(), legend_color.as_deref(), pool).await?;
    info!(company_id = %company.id, "Company updated");
    Ok(company.into())
}

/// Soft-delete a company together with its facilities.
pub async fn delete_company(id: CompanyId, pool: &PgPool) -> Result<()> {
    if !Company::soft_delete(id, pool).await? {
        return Err(NotFoundError("Company").into());
    }
    info!(company_id = %id, "Company deleted");
    Ok(())
}
