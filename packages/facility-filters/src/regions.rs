//! Named regions used for bulk state selection.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

const NORTHEAST: &[&str] = &["CT", "MA", "ME", "NH", "NJ", "NY", "PA", "RI", "VT"];
const SOUTHEAST: &[&str] = &[
    "AL", "AR", "DC", "DE", "FL", "GA", "KY", "LA", "MD", "MS", "NC", "SC", "TN", "VA", "WV",
];
const MIDWEST: &[&str] = &[
    "IA", "IL", "IN", "KS", "MI", "MN", "MO", "ND", "NE", "OH", "SD", "WI",
];
const SOUTHWEST: &[&str] = &["AZ", "NM", "OK", "TX"];
const WEST: &[&str] = &["AK", "CA", "CO", "HI", "ID", "MT", "NV", "OR", "UT", "WA", "WY"];
const INTERNATIONAL: &[&str] = &[
    "AB", "BC", "MB", "NB", "NL", "NS", "ON", "PE", "QC", "SK", "MX",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Northeast,
    Southeast,
    Midwest,
    Southwest,
    West,
    International,
}

/// How much of a region the current state selection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSelection {
    None,
    Partial,
    Full,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Northeast,
        Region::Southeast,
        Region::Midwest,
        Region::Southwest,
        Region::West,
        Region::International,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Northeast => "northeast",
            Self::Southeast => "southeast",
            Self::Midwest => "midwest",
            Self::Southwest => "southwest",
            Self::West => "west",
            Self::International => "international",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Northeast => "Northeast",
            Self::Southeast => "Southeast",
            Self::Midwest => "Midwest",
            Self::Southwest => "Southwest",
            Self::West => "West",
            Self::International => "International",
        }
    }

    /// State / province codes belonging to this region.
    pub fn states(&self) -> &'static [&'static str] {
        match self {
            Self::Northeast => NORTHEAST,
            Self::Southeast => SOUTHEAST,
            Self::Midwest => MIDWEST,
            Self::Southwest => SOUTHWEST,
            Self::West => WEST,
            Self::International => INTERNATIONAL,
        }
    }

    pub fn contains_state(&self, state: &str) -> bool {
        let state = state.trim();
        self.states().iter().any(|s| s.eq_ignore_ascii_case(state))
    }

    /// Region a state code belongs to, if any.
    pub fn for_state(state: &str) -> Option<Region> {
        Self::ALL.into_iter().find(|r| r.contains_state(state))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::InvalidParam {
                name: "region",
                value: s.to_string(),
            })
    }
}

/// Classify how `selected_states` covers `region`.
pub fn region_selection(region: Region, selected_states: &BTreeSet<String>) -> RegionSelection {
    let covered = region
        .states()
        .iter()
        .filter(|code| selected_states.iter().any(|s| s.eq_ignore_ascii_case(code)))
        .count();

    match covered {
        0 => RegionSelection::None,
        n if n == region.states().len() => RegionSelection::Full,
        _ => RegionSelection::Partial,
    }
}

/// True only when every state of the region is selected.
pub fn is_region_selected(region: Region, selected_states: &BTreeSet<String>) -> bool {
    region_selection(region, selected_states) == RegionSelection::Full
}

/// Union of explicit states and all states of the given regions, uppercased.
pub fn expand_states<'a>(
    regions: impl IntoIterator<Item = &'a Region>,
    states: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<String> {
    let mut expanded: BTreeSet<String> = states
        .into_iter()
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    for region in regions {
        expanded.extend(region.states().iter().map(|s| s.to_string()));
    }

    expanded
}

/// Toggle a whole region on or off within a state selection.
///
/// A fully selected region is cleared; anything else becomes fully selected.
pub fn toggle_region(region: Region, selected_states: &BTreeSet<String>) -> BTreeSet<String> {
    let mut next = selected_states.clone();
    if is_region_selected(region, selected_states) {
        next.retain(|s| !region.contains_state(s));
    } else {
        next.extend(region.states().iter().map(|s| s.to_string()));
    }
    next
}
