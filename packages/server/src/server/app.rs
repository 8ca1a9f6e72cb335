//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_company_handler, create_facility_handler, delete_company_handler,
    delete_facility_handler, facility_analytics_handler, filter_options_handler,
    get_company_handler, get_facility_handler, health_handler, list_companies_handler,
    list_facilities_handler, search_facilities_handler, template_address_handler,
    template_coordinates_handler, update_company_handler, update_facility_handler,
    upload_csv_handler,
};

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

/// Build the Axum application router
///
/// An empty `allowed_origins` allows any origin.
pub fn build_app(server_deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let upload_limit = server_deps.ingest.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let app_state = AxumAppState {
        db_pool: server_deps.db_pool.clone(),
        server_deps: Arc::new(server_deps),
    };

    Router::new()
        .route("/health", get(health_handler))
        // Companies
        .route(
            "/api/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route(
            "/api/companies/:id",
            get(get_company_handler)
                .put(update_company_handler)
                .delete(delete_company_handler),
        )
        // Facilities
        .route(
            "/api/facilities",
            get(list_facilities_handler).post(create_facility_handler),
        )
        .route("/api/facilities/search", get(search_facilities_handler))
        .route("/api/facilities/analytics", get(facility_analytics_handler))
        .route("/api/facilities/filter-options", get(filter_options_handler))
        .route(
            "/api/facilities/:id",
            get(get_facility_handler)
                .put(update_facility_handler)
                .delete(delete_facility_handler),
        )
        // CSV upload
        .route(
            "/api/upload/csv",
            post(upload_csv_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/upload/templates/address", get(template_address_handler))
        .route(
            "/api/upload/templates/coordinates",
            get(template_coordinates_handler),
        )
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
