//! Property tests for the filter library.

use std::collections::BTreeSet;

use facility_filters::{
    haversine_miles, is_region_selected, region_selection, DistanceUnit, FilterPatch,
    FilterState, FilterStore, Filterable, LatLng, ProximityPatch, Region, RegionSelection,
    AdvancedPatch,
};
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Site {
    company_id: Uuid,
    address: String,
    state: String,
    location: LatLng,
    tags: Vec<String>,
}

impl Filterable for Site {
    fn company_id(&self) -> Uuid {
        self.company_id
    }
    fn name(&self) -> &str {
        "Depot"
    }
    fn company_name(&self) -> &str {
        "Acme"
    }
    fn address(&self) -> &str {
        &self.address
    }
    fn state(&self) -> &str {
        &self.state
    }
    fn location(&self) -> Option<LatLng> {
        Some(self.location)
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

const TAG_POOL: &[&str] = &["warehouse", "office", "cold storage", "hazmat", "retail"];
const STATE_POOL: &[&str] = &["MN", "TX", "NY", "CA", "ON"];

fn point() -> impl Strategy<Value = LatLng> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| LatLng::new(lat, lng))
}

fn tag_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(TAG_POOL), 0..4)
        .prop_map(|tags| tags.into_iter().map(str::to_string).collect())
}

fn site() -> impl Strategy<Value = Site> {
    (point(), prop::sample::select(STATE_POOL), tag_set()).prop_map(
        |(location, state, tags)| Site {
            company_id: Uuid::nil(),
            address: format!("1 Main St, Springfield, {} 00000", state),
            state: state.to_string(),
            location,
            tags,
        },
    )
}

fn patch() -> impl Strategy<Value = FilterPatch> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(prop::option::of(point())),
        prop::option::of(prop_oneof![
            -5000.0f64..5000.0,
            Just(f64::NAN),
            Just(f64::INFINITY),
        ]),
        prop::option::of(prop_oneof![
            Just(DistanceUnit::Miles),
            Just(DistanceUnit::Kilometers)
        ]),
        prop::option::of("[a-z ]{0,8}"),
    )
        .prop_map(|(enabled, center, radius, unit, term)| FilterPatch {
            search_term: term,
            proximity: Some(ProximityPatch {
                enabled,
                center,
                radius,
                unit,
            }),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn haversine_is_non_negative_and_zero_on_self(a in point(), b in point()) {
        prop_assert!(haversine_miles(a, b) >= 0.0);
        prop_assert_eq!(haversine_miles(a, a), 0.0);
    }

    #[test]
    fn haversine_is_symmetric(a in point(), b in point()) {
        prop_assert!((haversine_miles(a, b) - haversine_miles(b, a)).abs() < 1e-6);
    }

    #[test]
    fn radius_stays_in_range(patches in prop::collection::vec(patch(), 1..20)) {
        let mut store = FilterStore::default();
        for p in patches {
            store.update(p);
            let radius = store.snapshot().proximity.radius;
            prop_assert!((1.0..=1000.0).contains(&radius), "radius {}", radius);
        }
    }

    #[test]
    fn disabled_proximity_ignores_center(
        sites in prop::collection::vec(site(), 0..20),
        c1 in point(),
        c2 in point(),
        radius in 1.0f64..1000.0,
    ) {
        let with_center = |c: LatLng| {
            FilterState::default().apply(FilterPatch::proximity(ProximityPatch {
                enabled: Some(false),
                center: Some(Some(c)),
                radius: Some(radius),
                unit: None,
            }))
        };

        let a = with_center(c1).predicate();
        let b = with_center(c2).predicate();
        for s in &sites {
            prop_assert_eq!(a.matches(s), b.matches(s));
        }
    }

    #[test]
    fn match_all_is_subset_of_match_any(
        sites in prop::collection::vec(site(), 0..30),
        wanted in tag_set(),
    ) {
        let wanted: BTreeSet<String> = wanted.into_iter().collect();
        let any = FilterState::default().apply(FilterPatch::advanced(AdvancedPatch {
            tags: Some(wanted.clone()),
            match_all_tags: Some(false),
            ..Default::default()
        }));
        let all = any.apply(FilterPatch::advanced(AdvancedPatch {
            match_all_tags: Some(true),
            ..Default::default()
        }));

        for s in &sites {
            let have: BTreeSet<&str> = s.tags.iter().map(String::as_str).collect();
            let all_expected = wanted.iter().all(|w| have.contains(w.as_str()));
            let any_expected = wanted.is_empty() || wanted.iter().any(|w| have.contains(w.as_str()));

            prop_assert_eq!(all.matches(s), all_expected);
            prop_assert_eq!(any.matches(s), any_expected);
            if all.matches(s) {
                prop_assert!(any.matches(s));
            }
        }
    }

    #[test]
    fn region_full_until_one_state_removed(
        region in prop::sample::select(Region::ALL.to_vec()),
        drop_index in any::<prop::sample::Index>(),
    ) {
        let mut states: BTreeSet<String> = region.states().iter().map(|s| s.to_string()).collect();
        prop_assert!(is_region_selected(region, &states));

        let victim = drop_index.get(region.states());
        states.remove(*victim);
        prop_assert!(!is_region_selected(region, &states));
        prop_assert_eq!(region_selection(region, &states), RegionSelection::Partial);
    }
}
