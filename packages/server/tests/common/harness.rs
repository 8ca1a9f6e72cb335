//! Test harness with testcontainers for integration testing.
//!
//! Uses one shared PostGIS container across all tests. The container and
//! migrations are initialized once on first test, then reused. Tests share
//! the database, so each one works on uniquely named companies.

use anyhow::{Context, Result};
use facility_core::kernel::{MockGeocoder, ServerDeps};
use facility_core::IngestSettings;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::ApiClient;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

/// Global shared infrastructure - initialized once, reused by all tests.
static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        // Postgres with PostGIS for geography columns and ST_DWithin
        let postgres = Postgres::default()
            .with_name("postgis/postgis")
            .with_tag("16-3.4")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start PostGIS container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    pub(super) async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.geocoder.clone().with_address("1 Main St, Duluth, MN", 46.78, -92.1);
///     let (status, body) = ctx.api().get("/api/companies").await;
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    /// Geocoder shared with `deps()` and `api()`; configure it per test.
    pub geocoder: MockGeocoder,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
            .await
            .expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self {
            db_pool,
            geocoder: MockGeocoder::new(),
        })
    }

    /// Server dependencies wired to the mock geocoder, with no geocoding delay.
    pub fn deps(&self) -> ServerDeps {
        let settings = IngestSettings {
            geocode_delay: Duration::ZERO,
            ..IngestSettings::default()
        };
        ServerDeps::new(self.db_pool.clone(), Arc::new(self.geocoder.clone()), settings)
    }

    /// HTTP client against the full router.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.deps())
    }
}
