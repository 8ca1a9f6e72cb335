//! Filter state, partial patches and the snapshot store.
//!
//! `FilterState` is an immutable value: `apply` returns a new state built from
//! a `FilterPatch`. `FilterStore` holds the current snapshot behind an `Arc`
//! together with a revision number so remote fetches can be matched against
//! the state they were issued for.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::distance::{DistanceUnit, LatLng};
use crate::regions::Region;

pub const MIN_RADIUS: f64 = 1.0;
pub const MAX_RADIUS: f64 = 1000.0;
pub const DEFAULT_RADIUS: f64 = 50.0;

/// Proximity circle around a center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proximity {
    pub enabled: bool,
    pub center: Option<LatLng>,
    pub radius: f64,
    pub unit: DistanceUnit,
}

impl Default for Proximity {
    fn default() -> Self {
        Self {
            enabled: false,
            center: None,
            radius: DEFAULT_RADIUS,
            unit: DistanceUnit::Miles,
        }
    }
}

impl Proximity {
    /// Center and radius in miles, when the circle actually constrains results.
    pub fn active_circle(&self) -> Option<(LatLng, f64)> {
        match self.center {
            Some(center) if self.enabled && center.is_valid() => {
                Some((center, self.unit.to_miles(self.radius)))
            }
            _ => None,
        }
    }
}

/// Region / state / company / tag selections from the advanced panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilters {
    pub regions: BTreeSet<Region>,
    pub states: BTreeSet<String>,
    pub companies: BTreeSet<Uuid>,
    pub tags: BTreeSet<String>,
    pub match_all_tags: bool,
}

impl AdvancedFilters {
    pub fn has_state_constraint(&self) -> bool {
        !self.regions.is_empty() || !self.states.is_empty()
    }
}

/// The full set of active search criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub companies: BTreeSet<Uuid>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub proximity: Proximity,
    pub advanced: AdvancedFilters,
}

/// Conditions that are tolerated but worth surfacing to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterWarning {
    /// Proximity is enabled but there is no usable center, so it is ignored
    ProximityWithoutCenter,
    InvalidProximityCenter { latitude: f64, longitude: f64 },
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Field-by-field patch for `Proximity`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProximityPatch {
    pub enabled: Option<bool>,
    /// `Some(None)` clears the center; `None` leaves it untouched
    #[serde(deserialize_with = "deserialize_some")]
    pub center: Option<Option<LatLng>>,
    pub radius: Option<f64>,
    pub unit: Option<DistanceUnit>,
}

/// Field-by-field patch for `AdvancedFilters`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedPatch {
    pub regions: Option<BTreeSet<Region>>,
    pub states: Option<BTreeSet<String>>,
    pub companies: Option<BTreeSet<Uuid>>,
    pub tags: Option<BTreeSet<String>>,
    pub match_all_tags: Option<bool>,
}

/// Partial update for `FilterState`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterPatch {
    pub search_term: Option<String>,
    pub companies: Option<BTreeSet<Uuid>>,
    pub states: Option<BTreeSet<String>>,
    pub cities: Option<BTreeSet<String>>,
    pub proximity: Option<ProximityPatch>,
    pub advanced: Option<AdvancedPatch>,
}

impl FilterPatch {
    pub fn search_term(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn proximity(patch: ProximityPatch) -> Self {
        Self {
            proximity: Some(patch),
            ..Default::default()
        }
    }

    pub fn advanced(patch: AdvancedPatch) -> Self {
        Self {
            advanced: Some(patch),
            ..Default::default()
        }
    }
}

/// Keep a radius inside [MIN_RADIUS, MAX_RADIUS]. Non-finite values fall back to the default.
pub fn clamp_radius(radius: f64) -> f64 {
    if radius.is_finite() {
        radius.clamp(MIN_RADIUS, MAX_RADIUS)
    } else {
        DEFAULT_RADIUS
    }
}

impl FilterState {
    /// Start with a single company preselected.
    pub fn with_company(company_id: Uuid) -> Self {
        let mut state = Self::default();
        state.companies.insert(company_id);
        state
    }

    /// Merge a patch, returning the resulting state.
    pub fn apply(&self, patch: FilterPatch) -> FilterState {
        let mut next = self.clone();

        if let Some(term) = patch.search_term {
            next.search_term = term;
        }
        if let Some(companies) = patch.companies {
            next.companies = companies;
        }
        if let Some(states) = patch.states {
            next.states = states;
        }
        if let Some(cities) = patch.cities {
            next.cities = cities;
        }

        if let Some(p) = patch.proximity {
            if let Some(enabled) = p.enabled {
                next.proximity.enabled = enabled;
            }
            if let Some(center) = p.center {
                next.proximity.center = center;
            }
            if let Some(radius) = p.radius {
                next.proximity.radius = radius;
            }
            if let Some(unit) = p.unit {
                next.proximity.unit = unit;
            }
        }
        next.proximity.radius = clamp_radius(next.proximity.radius);

        if let Some(a) = patch.advanced {
            if let Some(regions) = a.regions {
                next.advanced.regions = regions;
            }
            if let Some(states) = a.states {
                next.advanced.states = states;
            }
            if let Some(companies) = a.companies {
                next.advanced.companies = companies;
            }
            if let Some(tags) = a.tags {
                next.advanced.tags = tags;
            }
            if let Some(match_all) = a.match_all_tags {
                next.advanced.match_all_tags = match_all;
            }
        }

        next
    }

    pub fn warnings(&self) -> Vec<FilterWarning> {
        let mut warnings = Vec::new();
        if self.proximity.enabled {
            match self.proximity.center {
                None => warnings.push(FilterWarning::ProximityWithoutCenter),
                Some(c) if !c.is_valid() => warnings.push(FilterWarning::InvalidProximityCenter {
                    latitude: c.latitude,
                    longitude: c.longitude,
                }),
                Some(_) => {}
            }
        }
        warnings
    }

    /// True when no criterion constrains the result set.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.companies.is_empty()
            && self.states.is_empty()
            && self.cities.is_empty()
            && self.proximity.active_circle().is_none()
            && self.advanced.regions.is_empty()
            && self.advanced.states.is_empty()
            && self.advanced.companies.is_empty()
            && self.advanced.tags.is_empty()
    }
}

/// Outcome of `FilterStore::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Changed { revision: u64 },
    Unchanged,
}

impl UpdateOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Revision stamp for a remote fetch issued from a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    revision: u64,
}

impl FetchTicket {
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Single source of truth for filter state.
///
/// Consumers hold an `&mut FilterStore` (or wrap it as they see fit) and read
/// immutable snapshots. Responses to fetches issued at an older revision are
/// rejected by `is_current`, so a slow response can never overwrite the
/// results of a newer filter.
#[derive(Debug, Clone)]
pub struct FilterStore {
    current: Arc<FilterState>,
    revision: u64,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterStore {
    pub fn new(initial: FilterState) -> Self {
        // Route the initial state through apply so the radius invariant holds
        let initial = initial.apply(FilterPatch::default());
        Self {
            current: Arc::new(initial),
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<FilterState> {
        Arc::clone(&self.current)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Merge a patch. No-op when the merged state deep-equals the current one.
    pub fn update(&mut self, patch: FilterPatch) -> UpdateOutcome {
        let next = self.current.apply(patch);
        self.commit(next)
    }

    /// Replace the whole state (e.g. "clear all filters").
    pub fn reset(&mut self, state: FilterState) -> UpdateOutcome {
        let next = state.apply(FilterPatch::default());
        self.commit(next)
    }

    fn commit(&mut self, next: FilterState) -> UpdateOutcome {
        if next == *self.current {
            return UpdateOutcome::Unchanged;
        }

        for warning in next.warnings() {
            tracing::warn!(?warning, "Filter state accepted with warning");
        }

        self.current = Arc::new(next);
        self.revision += 1;
        UpdateOutcome::Changed {
            revision: self.revision,
        }
    }

    /// Stamp a fetch about to be issued for the current snapshot.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            revision: self.revision,
        }
    }

    /// Whether a response for `ticket` still reflects the current state.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.revision == self.revision
    }
}
