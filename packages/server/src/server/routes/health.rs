use std::future::Future;
use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::server::app::AxumAppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: CheckHealth,
    postgis: CheckHealth,
    connection_pool: ConnectionPoolHealth,
}

/// Outcome of one dependency check.
#[derive(Serialize)]
pub struct CheckHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CheckHealth {
    fn ok(version: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version,
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            version: None,
            error: Some(message),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_connections: Option<u32>,
}

async fn timed<T>(query: impl Future<Output = Result<T, sqlx::Error>>) -> Result<T, String> {
    match tokio::time::timeout(CHECK_TIMEOUT, query).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("Query failed: {}", e)),
        Err(_) => Err(format!("Query timeout (>{}s)", CHECK_TIMEOUT.as_secs())),
    }
}

async fn check_database(pool: &PgPool) -> CheckHealth {
    match timed(sqlx::query("SELECT 1").execute(pool)).await {
        Ok(_) => CheckHealth::ok(None),
        Err(e) => CheckHealth::error(e),
    }
}

/// Radius search and duplicate detection need the extension, not just a connection.
async fn check_postgis(pool: &PgPool) -> CheckHealth {
    let query = sqlx::query_scalar::<_, String>("SELECT postgis_version()").fetch_one(pool);
    match timed(query).await {
        Ok(version) => CheckHealth::ok(Some(version)),
        Err(e) => CheckHealth::error(e),
    }
}

/// Health check endpoint
///
/// Returns 200 OK when the database answers and PostGIS is installed,
/// 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state.db_pool).await;
    let postgis = if database.is_ok() {
        check_postgis(&state.db_pool).await
    } else {
        CheckHealth::error("Database unavailable".to_string())
    };

    let pool_options = state.db_pool.options();
    let pool_health = ConnectionPoolHealth {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
        max_connections: Some(pool_options.get_max_connections()),
    };

    let (status_code, overall_status) = if database.is_ok() && postgis.is_ok() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            database,
            postgis,
            connection_pool: pool_health,
        }),
    )
}
