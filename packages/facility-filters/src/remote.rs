//! Query parameters for the server-side facility search.
//!
//! The same `SearchParams` type is produced by `FilterState::to_search_params`
//! on the client side and parsed back out of the request URL by the server,
//! so both sides agree on names and list encodings.

use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use crate::distance::{DistanceUnit, LatLng};
use crate::error::{FilterError, Result};
use crate::regions::expand_states;
use crate::state::FilterState;
use crate::tags::{normalize_tag, parse_tag_list, TagMatch};

/// Upper bound for a single page of search results.
pub const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub company_ids: Vec<Uuid>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    pub match_all_tags: bool,
    pub search_term: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub unit: Option<DistanceUnit>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl SearchParams {
    /// Center point, when both coordinates were supplied.
    pub fn center(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Center plus radius in meters, when a distance constraint applies.
    pub fn radius_meters(&self) -> Option<(LatLng, f64)> {
        let center = self.center()?;
        let radius = self.radius?;
        let unit = self.unit.unwrap_or_default();
        Some((center, unit.to_meters(radius)))
    }

    pub fn tag_match(&self) -> TagMatch {
        TagMatch::from_match_all(self.match_all_tags)
    }

    /// Reject out-of-range values. Called by `from_query_pairs`.
    pub fn validate(&self) -> Result<()> {
        if let Some(center) = self.center() {
            center.validate()?;
        } else if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(FilterError::InvalidParam {
                    name: "latitude",
                    value: lat.to_string(),
                });
            }
        } else if let Some(lng) = self.longitude {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(FilterError::InvalidParam {
                    name: "longitude",
                    value: lng.to_string(),
                });
            }
        }

        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(FilterError::InvalidParam {
                    name: "radius",
                    value: radius.to_string(),
                });
            }
        }

        if self.limit == Some(0) {
            return Err(FilterError::InvalidParam {
                name: "limit",
                value: "0".into(),
            });
        }

        Ok(())
    }

    /// Encode as URL query pairs. Lists repeat their key.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        for id in &self.company_ids {
            pairs.push(("companyId", id.to_string()));
        }
        for state in &self.states {
            pairs.push(("state", state.clone()));
        }
        for city in &self.cities {
            pairs.push(("city", city.clone()));
        }
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("matchAllTags", self.match_all_tags.to_string()));
        }
        if let Some(term) = &self.search_term {
            pairs.push(("searchTerm", term.clone()));
        }
        if let Some(lat) = self.latitude {
            pairs.push(("latitude", lat.to_string()));
        }
        if let Some(lng) = self.longitude {
            pairs.push(("longitude", lng.to_string()));
        }
        if let Some(radius) = self.radius {
            pairs.push(("radius", radius.to_string()));
        }
        if let Some(unit) = self.unit {
            pairs.push(("unit", unit.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }

        pairs
    }

    /// Encode as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Parse from decoded query pairs. Unknown keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = SearchParams::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            match key {
                "companyId" | "companyId[]" | "companyIds" => {
                    for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        let id = Uuid::parse_str(raw).map_err(|_| FilterError::InvalidParam {
                            name: "companyId",
                            value: raw.to_string(),
                        })?;
                        params.company_ids.push(id);
                    }
                }
                "state" | "state[]" | "states" => params.states.extend(split_list(value)),
                "city" | "city[]" | "cities" => params.cities.extend(split_list(value)),
                "tags" | "tags[]" | "tag" => params.tags.extend(parse_tag_list(value)),
                "matchAllTags" => params.match_all_tags = parse_bool("matchAllTags", value)?,
                "searchTerm" => params.search_term = Some(value.to_string()),
                "latitude" => params.latitude = Some(parse_f64("latitude", value)?),
                "longitude" => params.longitude = Some(parse_f64("longitude", value)?),
                "radius" => params.radius = Some(parse_f64("radius", value)?),
                "unit" => params.unit = Some(value.parse()?),
                "limit" => {
                    params.limit = Some(parse_u32("limit", value)?.min(MAX_PAGE_LIMIT));
                }
                "offset" => params.offset = Some(parse_u32("offset", value)?),
                _ => {}
            }
        }

        params.validate()?;
        Ok(params)
    }

    /// Parse from a raw (still percent-encoded) query string.
    pub fn from_query_str(query: &str) -> Result<Self> {
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }
}

/// Comma separated values, trimmed, blanks dropped.
fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_f64(name: &'static str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FilterError::InvalidParam {
            name,
            value: value.to_string(),
        })
}

fn parse_u32(name: &'static str, value: &str) -> Result<u32> {
    value.parse::<u32>().map_err(|_| FilterError::InvalidParam {
        name,
        value: value.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(FilterError::InvalidParam {
            name,
            value: value.to_string(),
        }),
    }
}

/// Intersect a basic and an advanced selection.
///
/// `None` means the field is unconstrained; `Some(empty)` means nothing can match.
fn combine<T: Ord + Clone>(basic: &BTreeSet<T>, advanced: &BTreeSet<T>) -> Option<BTreeSet<T>> {
    match (basic.is_empty(), advanced.is_empty()) {
        (true, true) => None,
        (false, true) => Some(basic.clone()),
        (true, false) => Some(advanced.clone()),
        (false, false) => Some(basic.intersection(advanced).cloned().collect()),
    }
}

impl FilterState {
    /// Build server-side search parameters for this state.
    ///
    /// Returns `None` when the basic and advanced selections have an empty
    /// intersection, in which case no request needs to be made.
    pub fn to_search_params(&self, page: Page) -> Option<SearchParams> {
        let advanced = &self.advanced;

        let company_ids = match combine(&self.companies, &advanced.companies) {
            Some(ids) if ids.is_empty() => return None,
            Some(ids) => ids.into_iter().collect(),
            None => Vec::new(),
        };

        let basic_states: BTreeSet<String> = self
            .states
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        let advanced_states = if advanced.has_state_constraint() {
            expand_states(advanced.regions.iter(), advanced.states.iter())
        } else {
            BTreeSet::new()
        };
        let states = match combine(&basic_states, &advanced_states) {
            Some(states) if states.is_empty() => return None,
            Some(states) => states.into_iter().collect(),
            None => Vec::new(),
        };

        let mut tags: Vec<String> = Vec::new();
        // A comma inside a tag would be split on the way back in
        for tag in advanced
            .tags
            .iter()
            .flat_map(|t| parse_tag_list(t))
            .map(|t| normalize_tag(&t))
        {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let term = self.search_term.trim();

        let mut params = SearchParams {
            company_ids,
            states,
            cities: self
                .cities
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            match_all_tags: advanced.match_all_tags && !tags.is_empty(),
            tags,
            search_term: (!term.is_empty()).then(|| term.to_string()),
            limit: page.limit.map(|l| l.min(MAX_PAGE_LIMIT)),
            offset: page.offset,
            ..Default::default()
        };

        if let Some((center, _)) = self.proximity.active_circle() {
            params.latitude = Some(center.latitude);
            params.longitude = Some(center.longitude);
            params.radius = Some(self.proximity.radius);
            params.unit = Some(self.proximity.unit);
        }

        Some(params)
    }
}
