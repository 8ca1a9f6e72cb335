use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{CompanyId, RecordStatus};

/// Company model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub legend_color: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Active company with its active facility count
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CompanyWithCount {
    #[sqlx(flatten)]
    pub company: Company,
    pub facility_count: i64,
}

impl Company {
    /// Find an active company by ID
    pub async fn find_by_id(id: CompanyId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies WHERE id = $1 AND status = 'active'")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id_optional(id: CompanyId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies WHERE id = $1 AND status = 'active'")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find an active company by name, ignoring case
    pub async fn find_active_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM companies WHERE LOWER(name) = LOWER($1) AND status = 'active'",
        )
        .bind(name.trim())
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// All active companies with their active facility counts, by name
    pub async fn find_active_with_counts(pool: &PgPool) -> Result<Vec<CompanyWithCount>> {
        sqlx::query_as::<_, CompanyWithCount>(
            "SELECT c.*, COUNT(f.id) AS facility_count
             FROM companies c
             LEFT JOIN facilities f ON f.company_id = c.id AND f.status = 'active'
             WHERE c.status = 'active'
             GROUP BY c.id
             ORDER BY LOWER(c.name)",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE status = 'active'")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Insert a new active company
    pub async fn create(name: &str, legend_color: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO companies (id, name, legend_color)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(CompanyId::new())
        .bind(name)
        .bind(legend_color)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update name and/or color; `None` leaves a field untouched
    pub async fn update(
        id: CompanyId,
        name: Option<&str>,
        legend_color: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE companies
             SET name = COALESCE($2, name),
                 legend_color = COALESCE($3, legend_color),
                 updated_at = NOW()
             WHERE id = $1 AND status = 'active'
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(legend_color)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft-delete a company and all of its facilities.
    ///
    /// Returns false when no active company had this id.
    pub async fn soft_delete(id: CompanyId, pool: &PgPool) -> Result<bool> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE companies SET status = 'deleted', updated_at = NOW()
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE facilities SET status = 'deleted', updated_at = NOW()
             WHERE company_id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
