//! Facility filter library.
//!
//! Holds everything about "which facilities should be shown" that does not
//! need a database: distance math, region tables, tag matching, the
//! immutable filter state with its revision-stamped store, and the two ways
//! of applying a filter.
//!
//! # Usage
//!
//! ```rust,ignore
//! use facility_filters::{FilterPatch, FilterStore, Page};
//!
//! let mut store = FilterStore::default();
//! store.update(FilterPatch::search_term("acme"));
//!
//! // Preloaded data: evaluate locally
//! let predicate = store.snapshot().predicate();
//! let visible = predicate.filter(&facilities);
//!
//! // Paged data: ask the server, drop the answer if filters moved on
//! let ticket = store.begin_fetch();
//! if let Some(params) = store.snapshot().to_search_params(Page::new(100, 0)) {
//!     let results = fetch(params.to_query_string()).await?;
//!     if store.is_current(ticket) {
//!         show(results);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`distance`] - Haversine distance, units and coordinate validation
//! - [`regions`] - Region → state tables and selection helpers
//! - [`tags`] - Tag normalization and any/all matching
//! - [`city`] - City derivation from address strings
//! - [`state`] - `FilterState`, patches and `FilterStore`
//! - [`predicate`] - In-memory filtering
//! - [`remote`] - Server-side search parameters

pub mod city;
pub mod distance;
pub mod error;
pub mod predicate;
pub mod regions;
pub mod remote;
pub mod state;
pub mod tags;

pub use city::derive_city;
pub use distance::{
    haversine_miles, is_valid_coordinate, km_to_miles, miles_to_km, DistanceUnit, LatLng,
    METERS_PER_MILE,
};
pub use error::{FilterError, Result};
pub use predicate::{FacilityPredicate, Filterable};
pub use regions::{expand_states, is_region_selected, region_selection, toggle_region, Region, RegionSelection};
pub use remote::{Page, SearchParams, MAX_PAGE_LIMIT};
pub use state::{
    AdvancedFilters, AdvancedPatch, FetchTicket, FilterPatch, FilterState, FilterStore,
    FilterWarning, Proximity, ProximityPatch, UpdateOutcome,
};
pub use tags::{matches_tags, normalize_tag, normalize_tags, parse_tag_list, TagMatch};
