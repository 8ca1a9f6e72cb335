//! Facilities domain - geocoded sites owned by companies, plus search and analytics

pub mod actions;
pub mod data;
pub mod models;

pub use data::FacilityData;
pub use models::{Facility, FacilityFields, FacilityRow};
