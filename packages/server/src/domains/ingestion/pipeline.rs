//! The CSV import pipeline.
//!
//! 1. Reject the upload outright if the file is missing, not `.csv`, too large
//!    or structurally broken.
//! 2. Validate and geocode rows one at a time, pausing between geocoder calls.
//! 3. Group geocoded rows by company name, in order of first appearance.
//! 4. Reuse or create each company, then store facilities, reusing any
//!    same-company facility within the duplicate radius.
//!
//! Rows never abort the batch; they end up in the report instead. There is no
//! transaction around the batch, so a rerun relies on the duplicate check.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::csv_file::{parse_csv, RawRow};
use super::error::IngestError;
use super::report::{CompanyOutcome, ImportReport};
use super::rows::{validate_row, ValidRow};
use crate::domains::companies::Company;
use crate::domains::facilities::actions::{resolve_location, synthesize_name, ResolvedLocation};
use crate::domains::facilities::{Facility, FacilityFields};
use crate::kernel::ServerDeps;

/// Checks that run before the file is parsed.
pub fn check_upload(file_name: Option<&str>, size: usize, limit: usize) -> Result<(), IngestError> {
    let file_name = file_name.map(str::trim).filter(|n| !n.is_empty());
    let Some(file_name) = file_name else {
        return Err(IngestError::MissingFile);
    };
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(IngestError::BadExtension(file_name.to_string()));
    }
    if size > limit {
        return Err(IngestError::TooLarge { limit });
    }
    if size == 0 {
        return Err(IngestError::Unparsable("file is empty".into()));
    }
    Ok(())
}

struct GeocodedRow {
    row: ValidRow,
    location: ResolvedLocation,
}

struct CompanyGroup {
    name: String,
    legend_color: String,
    rows: Vec<GeocodedRow>,
}

/// Import an uploaded CSV. Hard failures come back as `IngestError`.
pub async fn import_csv(file_name: &str, bytes: &[u8], deps: &ServerDeps) -> Result<ImportReport> {
    check_upload(Some(file_name), bytes.len(), deps.ingest.max_upload_bytes)?;
    let parsed = parse_csv(bytes)?;

    info!(file = %file_name, rows = parsed.total_rows(), "Starting CSV import");

    let mut report = ImportReport::new(parsed.total_rows());
    for skipped in parsed.unreadable {
        debug!(row = skipped.row, reason = %skipped.reason, "Skipping row");
        report.skip(skipped.row, skipped.reason);
    }
    let groups = geocode_rows(parsed.rows, deps, &mut report).await;
    persist_groups(groups, deps, &mut report).await;
    let report = report.finish();

    info!(
        file = %file_name,
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        duplicates = report.duplicates,
        created = report.total_facilities,
        "CSV import finished"
    );
    Ok(report)
}

async fn geocode_rows(
    rows: Vec<RawRow>,
    deps: &ServerDeps,
    report: &mut ImportReport,
) -> IndexMap<String, CompanyGroup> {
    let delay = deps.ingest.geocode_delay;
    let mut groups: IndexMap<String, CompanyGroup> = IndexMap::new();
    let mut called_geocoder = false;

    for raw in rows {
        let line = raw.row;
        let row = match validate_row(raw) {
            Ok(row) => row,
            Err(reason) => {
                debug!(row = line, reason = %reason, "Skipping row");
                report.skip(line, reason);
                continue;
            }
        };

        if row.needs_geocoding() {
            if called_geocoder && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            called_geocoder = true;
        }

        let location = match resolve_location(
            row.address.as_deref(),
            row.point,
            row.hints(),
            deps.geocoder.as_ref(),
        )
        .await
        {
            Ok(location) => location,
            Err(e) => {
                warn!(row = line, error = %e, "Geocoding failed");
                report.fail(line, format!("Geocoding failed: {}", e));
                continue;
            }
        };

        groups
            .entry(row.company_name.to_lowercase())
            .or_insert_with(|| CompanyGroup {
                name: row.company_name.clone(),
                legend_color: row.legend_color.clone(),
                rows: Vec::new(),
            })
            .rows
            .push(GeocodedRow { row, location });
    }

    groups
}

/// Existing active company by name (color brought up to date), or a new one.
async fn upsert_company(group: &CompanyGroup, deps: &ServerDeps) -> Result<(Company, bool, bool)> {
    let pool = &deps.db_pool;
    match Company::find_active_by_name(&group.name, pool).await? {
        Some(existing) if existing.legend_color.eq_ignore_ascii_case(&group.legend_color) => {
            Ok((existing, false, false))
        }
        Some(existing) => {
            let updated = Company::update(existing.id, None, Some(&group.legend_color), pool).await?;
            info!(company = %updated.name, color = %updated.legend_color, "Updated company color");
            Ok((updated, false, true))
        }
        None => {
            let created = Company::create(&group.name, &group.legend_color, pool).await?;
            info!(company = %created.name, "Created company");
            Ok((created, true, false))
        }
    }
}

async fn persist_groups(
    groups: IndexMap<String, CompanyGroup>,
    deps: &ServerDeps,
    report: &mut ImportReport,
) {
    let pool = &deps.db_pool;
    let radius = deps.ingest.duplicate_radius_meters;

    for (_, group) in groups {
        let (company, created, color_updated) = match upsert_company(&group, deps).await {
            Ok(result) => result,
            Err(e) => {
                warn!(company = %group.name, error = %e, "Failed to save company");
                for geocoded in &group.rows {
                    report.fail(
                        geocoded.row.row,
                        format!("Could not save company '{}': {}", group.name, e),
                    );
                }
                continue;
            }
        };

        let mut outcome = CompanyOutcome {
            id: company.id.to_string(),
            name: company.name.clone(),
            created,
            color_updated,
            facilities_created: 0,
            duplicates: 0,
        };

        for GeocodedRow { row, location } in group.rows {
            match Facility::find_duplicate(company.id, location.point, radius, pool).await {
                Ok(Some(existing)) => {
                    debug!(row = row.row, facility_id = %existing.id, "Duplicate facility, reusing");
                    outcome.duplicates += 1;
                    report.duplicates += 1;
                    report.processed += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(row = row.row, error = %e, "Duplicate check failed");
                    report.fail(row.row, format!("Could not save facility: {}", e));
                    continue;
                }
            }

            let name = row
                .name
                .clone()
                .unwrap_or_else(|| synthesize_name(&location));
            let fields = FacilityFields {
                name,
                address: location.address,
                city: location.city,
                state: location.state,
                zip_code: location.zip_code,
                latitude: location.point.latitude,
                longitude: location.point.longitude,
                tags: row.tags,
            };

            match Facility::create(company.id, &fields, pool).await {
                Ok(facility) => {
                    debug!(row = row.row, facility_id = %facility.id, company = %company.name, "Created facility");
                    outcome.facilities_created += 1;
                    report.total_facilities += 1;
                    report.processed += 1;
                }
                Err(e) => {
                    warn!(row = row.row, error = %e, "Failed to save facility");
                    report.fail(row.row, format!("Could not save facility: {}", e));
                }
            }
        }

        report.companies.push(outcome);
    }
}
