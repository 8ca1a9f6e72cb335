//! Typed ids for the persisted entities.

pub use super::id::Id;

/// Marker type for companies.
pub struct Company;

/// Marker type for facilities.
pub struct Facility;

pub type CompanyId = Id<Company>;

pub type FacilityId = Id<Facility>;
