//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GoogleGeocoderAdapter, ServerDeps};
pub use test_dependencies::MockGeocoder;
pub use traits::*;
