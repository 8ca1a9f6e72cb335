//! Facility actions - business logic called from HTTP handlers

mod location;
mod manage;
mod queries;

pub use location::{
    clean_tags, coordinates, resolve_location, synthesize_name, LocationHints, ResolvedLocation,
};
pub use manage::{create_facility, delete_facility, update_facility};
pub use queries::{facility_analytics, filter_options, get_facility, list_facilities, search_facilities};
