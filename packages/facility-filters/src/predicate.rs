//! Client-side evaluation of a `FilterState` against facility records.

use uuid::Uuid;

use crate::city::derive_city;
use crate::distance::{haversine_miles, LatLng};
use crate::regions::expand_states;
use crate::state::FilterState;
use crate::tags::{matches_tags, parse_tag_list, TagMatch};

/// Read-only view of a facility, as needed by the predicate.
pub trait Filterable {
    fn company_id(&self) -> Uuid;
    /// Display name of the facility itself
    fn name(&self) -> &str;
    fn company_name(&self) -> &str;
    fn address(&self) -> &str;
    fn state(&self) -> &str;
    fn location(&self) -> Option<LatLng>;
    fn tags(&self) -> &[String];

    /// City used for matching. Defaults to the city derived from the address.
    fn city(&self) -> Option<String> {
        derive_city(self.address())
    }
}

/// Precomputed matcher for one filter snapshot.
///
/// Building it once per snapshot avoids re-expanding regions and
/// re-normalizing selections for every record.
#[derive(Debug, Clone)]
pub struct FacilityPredicate {
    search_term: Option<String>,
    companies: Vec<Uuid>,
    states: Vec<String>,
    cities: Vec<String>,
    circle: Option<(LatLng, f64)>,
    advanced_states: Option<Vec<String>>,
    advanced_companies: Vec<Uuid>,
    tags: Vec<String>,
    tag_match: TagMatch,
}

impl FacilityPredicate {
    pub fn new(state: &FilterState) -> Self {
        let term = state.search_term.trim().to_lowercase();
        let advanced = &state.advanced;

        let advanced_states = advanced.has_state_constraint().then(|| {
            expand_states(advanced.regions.iter(), advanced.states.iter())
                .into_iter()
                .collect()
        });

        Self {
            search_term: (!term.is_empty()).then_some(term),
            companies: state.companies.iter().copied().collect(),
            states: state.states.iter().map(|s| s.trim().to_lowercase()).collect(),
            cities: state.cities.iter().map(|c| c.trim().to_lowercase()).collect(),
            circle: state.proximity.active_circle(),
            advanced_states,
            advanced_companies: advanced.companies.iter().copied().collect(),
            tags: advanced.tags.iter().flat_map(|t| parse_tag_list(t)).collect(),
            tag_match: TagMatch::from_match_all(advanced.match_all_tags),
        }
    }

    pub fn matches<F: Filterable + ?Sized>(&self, facility: &F) -> bool {
        if let Some(term) = &self.search_term {
            let city = facility.city().unwrap_or_default();
            let hit = [
                facility.name(),
                facility.company_name(),
                facility.address(),
                facility.state(),
                city.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }

        if !self.companies.is_empty() && !self.companies.contains(&facility.company_id()) {
            return false;
        }

        if !self.states.is_empty() {
            let state = facility.state().trim().to_lowercase();
            if !self.states.contains(&state) {
                return false;
            }
        }

        if !self.cities.is_empty() {
            let hit = facility
                .city()
                .map(|c| self.cities.contains(&c.trim().to_lowercase()))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some((center, radius_miles)) = self.circle {
            match facility.location() {
                Some(point) if haversine_miles(center, point) <= radius_miles => {}
                _ => return false,
            }
        }

        if let Some(allowed) = &self.advanced_states {
            let state = facility.state().trim().to_ascii_uppercase();
            if !allowed.contains(&state) {
                return false;
            }
        }

        if !self.advanced_companies.is_empty()
            && !self.advanced_companies.contains(&facility.company_id())
        {
            return false;
        }

        matches_tags(facility.tags(), &self.tags, self.tag_match)
    }

    /// Keep the records that pass, preserving input order.
    pub fn filter<'a, F: Filterable>(&self, facilities: &'a [F]) -> Vec<&'a F> {
        facilities.iter().filter(|f| self.matches(*f)).collect()
    }
}

impl FilterState {
    pub fn predicate(&self) -> FacilityPredicate {
        FacilityPredicate::new(self)
    }

    /// One-off check of a single record.
    pub fn matches<F: Filterable + ?Sized>(&self, facility: &F) -> bool {
        self.predicate().matches(facility)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::distance::DistanceUnit;
    use crate::regions::Region;
    use crate::state::{AdvancedPatch, FilterPatch, ProximityPatch};
    use std::collections::BTreeSet;

    #[derive(Debug, Clone)]
    pub(crate) struct Record {
        pub company_id: Uuid,
        pub name: String,
        pub company_name: String,
        pub address: String,
        pub state: String,
        pub location: Option<LatLng>,
        pub tags: Vec<String>,
    }

    impl Filterable for Record {
        fn company_id(&self) -> Uuid {
            self.company_id
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn company_name(&self) -> &str {
            &self.company_name
        }
        fn address(&self) -> &str {
            &self.address
        }
        fn state(&self) -> &str {
            &self.state
        }
        fn location(&self) -> Option<LatLng> {
            self.location
        }
        fn tags(&self) -> &[String] {
            &self.tags
        }
    }

    fn minneapolis(company_id: Uuid) -> Record {
        Record {
            company_id,
            name: "North Loop Depot".into(),
            company_name: "Acme Logistics".into(),
            address: "100 Main St, Minneapolis, MN 55401".into(),
            state: "MN".into(),
            location: Some(LatLng::new(44.98, -93.27)),
            tags: vec!["Warehouse".into(), "cold storage".into()],
        }
    }

    #[test]
    fn test_default_state_matches_everything() {
        let record = minneapolis(Uuid::new_v4());
        assert!(FilterState::default().matches(&record));
    }

    #[test]
    fn test_search_term_hits_derived_city() {
        let record = minneapolis(Uuid::new_v4());
        let state = FilterState::default().apply(FilterPatch::search_term("  MINNEAP "));
        assert!(state.matches(&record));

        let state = FilterState::default().apply(FilterPatch::search_term("duluth"));
        assert!(!state.matches(&record));
    }

    #[test]
    fn test_search_term_hits_facility_name() {
        let record = minneapolis(Uuid::new_v4());
        let state = FilterState::default().apply(FilterPatch::search_term("loop dep"));
        assert!(state.matches(&record));
    }

    #[test]
    fn test_comma_joined_advanced_tag_matches_its_parts() {
        let record = minneapolis(Uuid::new_v4());
        let state = FilterState::default().apply(FilterPatch::advanced(AdvancedPatch {
            tags: Some(BTreeSet::from(["office, warehouse".to_string()])),
            ..Default::default()
        }));
        assert!(state.matches(&record));
    }

    #[test]
    fn test_state_and_city_are_case_insensitive() {
        let record = minneapolis(Uuid::new_v4());
        let state = FilterState::default().apply(FilterPatch {
            states: Some(BTreeSet::from(["mn".to_string()])),
            cities: Some(BTreeSet::from(["MINNEAPOLIS".to_string()])),
            ..Default::default()
        });
        assert!(state.matches(&record));

        let state = state.apply(FilterPatch {
            cities: Some(BTreeSet::from(["St Paul".to_string()])),
            ..Default::default()
        });
        assert!(!state.matches(&record));
    }

    #[test]
    fn test_company_selection() {
        let id = Uuid::new_v4();
        let record = minneapolis(id);
        assert!(FilterState::with_company(id).matches(&record));
        assert!(!FilterState::with_company(Uuid::new_v4()).matches(&record));
    }

    #[test]
    fn test_proximity_in_kilometers() {
        let record = minneapolis(Uuid::new_v4());
        let st_paul = LatLng::new(44.95, -93.09);

        // ~9 miles ≈ 14.5 km
        let within = FilterState::default().apply(FilterPatch::proximity(ProximityPatch {
            enabled: Some(true),
            center: Some(Some(st_paul)),
            radius: Some(20.0),
            unit: Some(DistanceUnit::Kilometers),
        }));
        assert!(within.matches(&record));

        let outside = within.apply(FilterPatch::proximity(ProximityPatch {
            radius: Some(10.0),
            ..Default::default()
        }));
        assert!(!outside.matches(&record));
    }

    #[test]
    fn test_proximity_without_center_is_ignored() {
        let record = minneapolis(Uuid::new_v4());
        let state = FilterState::default().apply(FilterPatch::proximity(ProximityPatch {
            enabled: Some(true),
            radius: Some(1.0),
            ..Default::default()
        }));
        assert!(state.matches(&record));
    }

    #[test]
    fn test_advanced_region_expands_to_states() {
        let record = minneapolis(Uuid::new_v4());
        let midwest = FilterState::default().apply(FilterPatch::advanced(AdvancedPatch {
            regions: Some(BTreeSet::from([Region::Midwest])),
            ..Default::default()
        }));
        assert!(midwest.matches(&record));

        let west_or_ny = FilterState::default().apply(FilterPatch::advanced(AdvancedPatch {
            regions: Some(BTreeSet::from([Region::West])),
            states: Some(BTreeSet::from(["ny".to_string()])),
            ..Default::default()
        }));
        assert!(!west_or_ny.matches(&record));
    }

    #[test]
    fn test_advanced_tags_any_and_all() {
        let record = minneapolis(Uuid::new_v4());
        let any = FilterState::default().apply(FilterPatch::advanced(AdvancedPatch {
            tags: Some(BTreeSet::from(["warehouse".to_string(), "office".to_string()])),
            ..Default::default()
        }));
        assert!(any.matches(&record));

        let all = any.apply(FilterPatch::advanced(AdvancedPatch {
            match_all_tags: Some(true),
            ..Default::default()
        }));
        assert!(!all.matches(&record));
    }

    #[test]
    fn test_filter_preserves_order() {
        let keep = Uuid::new_v4();
        let records = vec![
            minneapolis(keep),
            minneapolis(Uuid::new_v4()),
            minneapolis(keep),
        ];
        let predicate = FilterState::with_company(keep).predicate();
        let kept = predicate.filter(&records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.company_id == keep));
    }
}
