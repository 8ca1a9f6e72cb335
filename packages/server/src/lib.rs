// Facility Map - API Core
//
// Backend for mapping company facilities: CSV import with geocoding,
// filtered and proximity search, analytics.
//
// Domains live in domains/<name>/{models,data,actions}. Pure filter logic
// lives in the facility-filters crate.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
