pub mod analytics;
pub mod facility;

pub use analytics::{count_tags, AnalyticsData, FilterOptionsData, RegionData};
pub use facility::{CreateFacilityInput, FacilityData, GeoPoint, UpdateFacilityInput};
