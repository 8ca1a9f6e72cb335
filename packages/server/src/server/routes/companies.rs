use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::parse_path_id;
use crate::common::ApiResult;
use crate::domains::companies::actions;
use crate::domains::companies::data::{CompanyData, CreateCompanyInput, UpdateCompanyInput};
use crate::server::app::AxumAppState;

pub async fn list_companies_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<Vec<CompanyData>>> {
    Ok(Json(actions::list_companies(&state.db_pool).await?))
}

pub async fn get_company_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CompanyData>> {
    let id = parse_path_id(&id, "company")?;
    Ok(Json(actions::get_company(id, &state.db_pool).await?))
}

pub async fn create_company_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<CreateCompanyInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CompanyData>)> {
    let Json(input) = payload?;
    let company = actions::create_company(input, &state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update_company_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCompanyInput>, JsonRejection>,
) -> ApiResult<Json<CompanyData>> {
    let id = parse_path_id(&id, "company")?;
    let Json(input) = payload?;
    Ok(Json(actions::update_company(id, input, &state.db_pool).await?))
}

/// Soft delete; the company's facilities go with it.
pub async fn delete_company_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_path_id(&id, "company")?;
    actions::delete_company(id, &state.db_pool).await?;
    Ok(Json(json!({ "id": id.to_string(), "deleted": true })))
}
