pub mod analytics;
pub mod facility;
pub mod search;

pub use analytics::{CompanyCount, FacilityStats, StateCount};
pub use facility::{Facility, FacilityFields, FacilityRow};
