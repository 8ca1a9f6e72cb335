use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, RawQuery};
use axum::http::StatusCode;
use axum::Json;
use facility_filters::SearchParams;
use serde_json::{json, Value};

use super::parse_path_id;
use crate::common::{ApiError, ApiResult, CompanyId};
use crate::domains::facilities::actions;
use crate::domains::facilities::data::{
    AnalyticsData, CreateFacilityInput, FacilityData, FilterOptionsData, UpdateFacilityInput,
};
use crate::server::app::AxumAppState;

/// `?companyId=` restricts the list to one company.
pub async fn list_facilities_handler(
    Extension(state): Extension<AxumAppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<FacilityData>>> {
    let company_id: Option<CompanyId> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .find(|(key, value)| key == "companyId" && !value.trim().is_empty())
        .map(|(_, value)| parse_path_id(&value, "company"))
        .transpose()?;

    Ok(Json(actions::list_facilities(company_id, &state.db_pool).await?))
}

/// Filtered search. Lists may repeat their key (`state=MN&state=WI`) or be
/// comma separated.
pub async fn search_facilities_handler(
    Extension(state): Extension<AxumAppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<FacilityData>>> {
    let params = SearchParams::from_query_str(query.as_deref().unwrap_or_default())
        .map_err(ApiError::from)?;
    Ok(Json(actions::search_facilities(&params, &state.db_pool).await?))
}

pub async fn facility_analytics_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<AnalyticsData>> {
    Ok(Json(actions::facility_analytics(&state.db_pool).await?))
}

pub async fn filter_options_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<FilterOptionsData>> {
    Ok(Json(actions::filter_options(&state.db_pool).await?))
}

pub async fn get_facility_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FacilityData>> {
    let id = parse_path_id(&id, "facility")?;
    Ok(Json(actions::get_facility(id, &state.server_deps).await?))
}

pub async fn create_facility_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<CreateFacilityInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FacilityData>)> {
    let Json(input) = payload?;
    let facility = actions::create_facility(input, &state.server_deps).await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

pub async fn update_facility_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFacilityInput>, JsonRejection>,
) -> ApiResult<Json<FacilityData>> {
    let id = parse_path_id(&id, "facility")?;
    let Json(input) = payload?;
    Ok(Json(
        actions::update_facility(id, input, &state.server_deps).await?,
    ))
}

pub async fn delete_facility_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_path_id(&id, "facility")?;
    actions::delete_facility(id, &state.server_deps).await?;
    Ok(Json(json!({ "id": id.to_string(), "deleted": true })))
}
