use anyhow::Result;
use tracing::info;

use super::location::{clean_tags, coordinates, resolve_location, synthesize_name, LocationHints};
use crate::common::{CompanyId, FacilityId, NotFoundError, ValidationError};
use crate::domains::companies::actions::load_active_company;
use crate::domains::facilities::data::{CreateFacilityInput, FacilityData, UpdateFacilityInput};
use crate::domains::facilities::models::{Facility, FacilityFields};
use crate::kernel::ServerDeps;

fn parse_company_id(raw: &str) -> Result<CompanyId> {
    CompanyId::parse(raw)
        .map_err(|_| ValidationError::field("companyId", format!("invalid id '{}'", raw)).into())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load the joined row of an active facility as API data.
pub(super) async fn load_facility_data(id: FacilityId, deps: &ServerDeps) -> Result<FacilityData> {
    Facility::find_by_id(id, &deps.db_pool)
        .await?
        .map(FacilityData::from)
        .ok_or_else(|| NotFoundError("Facility").into())
}

/// Create a facility, geocoding or reverse geocoding as needed.
pub async fn create_facility(input: CreateFacilityInput, deps: &ServerDeps) -> Result<FacilityData> {
    let company_id = parse_company_id(&input.company_id)?;
    let company = load_active_company(company_id, &deps.db_pool).await?;
    let point = coordinates(input.latitude, input.longitude)?;

    let hints = LocationHints {
        city: input.city,
        state: input.state,
        zip_code: input.zip_code,
    };
    let location =
        resolve_location(input.address.as_deref(), point, hints, deps.geocoder.as_ref()).await?;

    let fields = FacilityFields {
        name: non_blank(input.name).unwrap_or_else(|| synthesize_name(&location)),
        tags: clean_tags(&input.tags),
        address: location.address,
        city: location.city,
        state: location.state,
        zip_code: location.zip_code,
        latitude: location.point.latitude,
        longitude: location.point.longitude,
    };

    let facility = Facility::create(company.id, &fields, &deps.db_pool).await?;
    info!(facility_id = %facility.id, company = %company.name, "Facility created");

    load_facility_data(facility.id, deps).await
}

/// Apply a partial update. A changed address without new coordinates is
/// geocoded again; new coordinates are stored as given.
pub async fn update_facility(
    id: FacilityId,
    input: UpdateFacilityInput,
    deps: &ServerDeps,
) -> Result<FacilityData> {
    let existing = Facility::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or(NotFoundError("Facility"))?
        .facility;

    let company_id = match input.company_id.as_deref() {
        Some(raw) => load_active_company(parse_company_id(raw)?, &deps.db_pool).await?.id,
        None => existing.company_id,
    };

    let point = coordinates(input.latitude, input.longitude)?;
    let new_address = non_blank(input.address).filter(|a| *a != existing.address);

    let mut fields = existing.fields();
    match (new_address, point) {
        (Some(address), None) => {
            let hints = LocationHints {
                city: input.city.clone(),
                state: input.state.clone(),
                zip_code: input.zip_code.clone(),
            };
            let location =
                resolve_location(Some(&address), None, hints, deps.geocoder.as_ref()).await?;
            info!(facility_id = %id, "Address changed, geocoded again");
            fields.address = location.address;
            fields.latitude = location.point.latitude;
            fields.longitude = location.point.longitude;
            fields.city = location.city;
            fields.state = location.state;
            fields.zip_code = location.zip_code;
        }
        (address, point) => {
            if let Some(address) = address {
                fields.address = address;
            }
            if let Some(point) = point {
                fields.latitude = point.latitude;
                fields.longitude = point.longitude;
            }
            if let Some(city) = input.city {
                fields.city = non_blank(Some(city));
            }
            if let Some(state) = input.state {
                fields.state = non_blank(Some(state));
            }
            if let Some(zip_code) = input.zip_code {
                fields.zip_code = non_blank(Some(zip_code));
            }
        }
    }

    if let Some(name) = non_blank(input.name) {
        fields.name = name;
    }
    if let Some(tags) = input.tags {
        fields.tags = clean_tags(&tags);
    }

    Facility::update(id, company_id, &fields, &deps.db_pool).await?;
    info!(facility_id = %id, "Facility updated");

    load_facility_data(id, deps).await
}

pub async fn delete_facility(id: FacilityId, deps: &ServerDeps) -> Result<()> {
    if !Facility::soft_delete(id, &deps.db_pool).await? {
        return Err(NotFoundError("Facility").into());
    }
    info!(facility_id = %id, "Facility deleted");
    Ok(())
}
