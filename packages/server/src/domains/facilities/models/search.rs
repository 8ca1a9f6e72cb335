//! Filtered facility search.
//!
//! Everything except tags is pushed into one SQL statement. Tags are matched
//! in memory after normalization, so pagination moves out of SQL whenever a
//! tag filter is present.

use anyhow::Result;
use facility_filters::{matches_tags, LatLng, SearchParams, METERS_PER_MILE};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::facility::{Facility, FacilityRow, FACILITY_COLUMNS};

/// Escape LIKE metacharacters and wrap in `%...%`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_point(qb: &mut QueryBuilder<'_, Postgres>, point: LatLng) {
    qb.push("ST_SetSRID(ST_MakePoint(")
        .push_bind(point.longitude)
        .push(", ")
        .push_bind(point.latitude)
        .push("), 4326)::geography");
}

pub(crate) fn build_search_query(params: &SearchParams) -> QueryBuilder<'static, Postgres> {
    let center = params.center();

    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(FACILITY_COLUMNS)
        .push(", c.name AS company_name, c.legend_color AS company_legend_color, ");
    match center {
        Some(point) => {
            qb.push("ST_Distance(f.geog, ");
            push_point(&mut qb, point);
            qb.push(") / ").push_bind(METERS_PER_MILE);
        }
        None => {
            qb.push("NULL::DOUBLE PRECISION");
        }
    }
    qb.push(
        " AS distance_miles
         FROM facilities f
         JOIN companies c ON c.id = f.company_id
         WHERE f.status = 'active' AND c.status = 'active'",
    );

    if !params.company_ids.is_empty() {
        qb.push(" AND f.company_id = ANY(")
            .push_bind(params.company_ids.clone())
            .push(")");
    }

    if !params.states.is_empty() {
        let states: Vec<String> = params
            .states
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        qb.push(" AND LOWER(f.state) = ANY(").push_bind(states).push(")");
    }

    if !params.cities.is_empty() {
        let patterns: Vec<String> = params
            .cities
            .iter()
            .map(|c| contains_pattern(c.trim()))
            .collect();
        qb.push(" AND f.city ILIKE ANY(").push_bind(patterns).push(")");
    }

    if let Some(term) = params.search_term.as_deref().map(str::trim) {
        if !term.is_empty() {
            let pattern = contains_pattern(term);
            qb.push(" AND (");
            for (i, column) in ["f.name", "f.address", "f.city", "f.state", "c.name"]
                .iter()
                .enumerate()
            {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }

    if let Some((point, meters)) = params.radius_meters() {
        qb.push(" AND ST_DWithin(f.geog, ");
        push_point(&mut qb, point);
        qb.push(", ").push_bind(meters).push(")");
    }

    if center.is_some() {
        qb.push(" ORDER BY distance_miles ASC, f.id");
    } else {
        qb.push(" ORDER BY LOWER(c.name), LOWER(f.name), f.id");
    }

    if params.tags.is_empty() {
        if let Some(limit) = params.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if let Some(offset) = params.offset {
            qb.push(" OFFSET ").push_bind(i64::from(offset));
        }
    }

    qb
}

impl Facility {
    /// Run a validated search. No matches is an empty list.
    pub async fn search(params: &SearchParams, pool: &PgPool) -> Result<Vec<FacilityRow>> {
        let mut qb = build_search_query(params);
        let rows: Vec<FacilityRow> = qb.build_query_as().fetch_all(pool).await?;

        if params.tags.is_empty() {
            return Ok(rows);
        }

        let mode = params.tag_match();
        let matched = rows
            .into_iter()
            .filter(|row| matches_tags(&row.facility.tags, &params.tags, mode));

        let offset = params.offset.unwrap_or(0) as usize;
        let limit = params.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let page: Vec<FacilityRow> = matched.skip(offset).take(limit).collect();

        debug!(tags = ?params.tags, ?mode, results = page.len(), "Applied tag filter");
        Ok(page)
    }
}
