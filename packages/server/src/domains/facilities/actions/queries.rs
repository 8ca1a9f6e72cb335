use anyhow::Result;
use facility_filters::{normalize_tags, Region, SearchParams};
use sqlx::PgPool;
use tracing::debug;

use super::manage::load_facility_data;
use crate::common::{CompanyId, FacilityId};
use crate::domains::companies::Company;
use crate::domains::facilities::data::{
    count_tags, AnalyticsData, FacilityData, FilterOptionsData,
};
use crate::domains::facilities::models::{Facility, FacilityStats};
use crate::kernel::ServerDeps;

pub async fn get_facility(id: FacilityId, deps: &ServerDeps) -> Result<FacilityData> {
    load_facility_data(id, deps).await
}

pub async fn list_facilities(
    company_id: Option<CompanyId>,
    pool: &PgPool,
) -> Result<Vec<FacilityData>> {
    let rows = Facility::find_active(company_id, pool).await?;
    Ok(rows.into_iter().map(FacilityData::from).collect())
}

/// Filtered search. `params` must already be validated.
pub async fn search_facilities(params: &SearchParams, pool: &PgPool) -> Result<Vec<FacilityData>> {
    let rows = Facility::search(params, pool).await?;
    debug!(results = rows.len(), "Facility search");
    Ok(rows.into_iter().map(FacilityData::from).collect())
}

pub async fn facility_analytics(pool: &PgPool) -> Result<AnalyticsData> {
    let tag_lists = FacilityStats::tag_lists(pool).await?;

    Ok(AnalyticsData {
        total_facilities: FacilityStats::total_facilities(pool).await?,
        total_companies: Company::count_active(pool).await?,
        by_company: FacilityStats::by_company(pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
        by_state: FacilityStats::by_state(pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
        by_tag: count_tags(&tag_lists),
    })
}

pub async fn filter_options(pool: &PgPool) -> Result<FilterOptionsData> {
    let tag_lists = FacilityStats::tag_lists(pool).await?;
    let mut tags = normalize_tags(&tag_lists.concat());
    tags.sort();

    Ok(FilterOptionsData {
        states: FacilityStats::distinct_states(pool).await?,
        cities: FacilityStats::distinct_cities(pool).await?,
        tags,
        regions: Region::ALL.into_iter().map(Into::into).collect(),
    })
}
