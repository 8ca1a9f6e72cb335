use anyhow::Result;
use sqlx::PgPool;

use crate::common::CompanyId;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CompanyCount {
    pub company_id: CompanyId,
    pub name: String,
    pub legend_color: String,
    pub count: i64,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct StateCount {
    pub state: String,
    pub count: i64,
}

/// Aggregate queries over active facilities of active companies
pub struct FacilityStats;

impl FacilityStats {
    pub async fn total_facilities(pool: &PgPool) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM facilities f
             JOIN companies c ON c.id = f.company_id
             WHERE f.status = 'active' AND c.status = 'active'",
        )
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Per-company counts, companies without facilities included
    pub async fn by_company(pool: &PgPool) -> Result<Vec<CompanyCount>> {
        sqlx::query_as::<_, CompanyCount>(
            "SELECT c.id AS company_id, c.name, c.legend_color, COUNT(f.id) AS count
             FROM companies c
             LEFT JOIN facilities f ON f.company_id = c.id AND f.status = 'active'
             WHERE c.status = 'active'
             GROUP BY c.id
             ORDER BY count DESC, LOWER(c.name)",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Counts keyed by upper-cased state; facilities without a state are left out
    pub async fn by_state(pool: &PgPool) -> Result<Vec<StateCount>> {
        sqlx::query_as::<_, StateCount>(
            "SELECT UPPER(btrim(f.state)) AS state, COUNT(*) AS count
             FROM facilities f
             JOIN companies c ON c.id = f.company_id
             WHERE f.status = 'active' AND c.status = 'active'
               AND f.state IS NOT NULL AND btrim(f.state) <> ''
             GROUP BY 1
             ORDER BY count DESC, 1",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Raw tag arrays; normalization happens in Rust
    pub async fn tag_lists(pool: &PgPool) -> Result<Vec<Vec<String>>> {
        let rows: Vec<Vec<String>> = sqlx::query_scalar(
            "SELECT f.tags
             FROM facilities f
             JOIN companies c ON c.id = f.company_id
             WHERE f.status = 'active' AND c.status = 'active' AND cardinality(f.tags) > 0",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn distinct_states(pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT UPPER(btrim(f.state))
             FROM facilities f
             JOIN companies c ON c.id = f.company_id
             WHERE f.status = 'active' AND c.status = 'active'
               AND f.state IS NOT NULL AND btrim(f.state) <> ''
             ORDER BY 1",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn distinct_cities(pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT ON (LOWER(btrim(f.city))) btrim(f.city)
             FROM facilities f
             JOIN companies c ON c.id = f.company_id
             WHERE f.status = 'active' AND c.status = 'active'
               AND f.city IS NOT NULL AND btrim(f.city) <> ''
             ORDER BY LOWER(btrim(f.city)), btrim(f.city)",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
