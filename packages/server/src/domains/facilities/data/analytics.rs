use std::collections::HashMap;

use facility_filters::{normalize_tags, Region};
use serde::Serialize;

use crate::domains::facilities::models::{CompanyCount, StateCount};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCountData {
    pub company_id: String,
    pub name: String,
    pub legend_color: String,
    pub count: i64,
}

impl From<CompanyCount> for CompanyCountData {
    fn from(row: CompanyCount) -> Self {
        Self {
            company_id: row.company_id.to_string(),
            name: row.name,
            legend_color: row.legend_color,
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StateCountData {
    pub state: String,
    pub count: i64,
}

impl From<StateCount> for StateCountData {
    fn from(row: StateCount) -> Self {
        Self {
            state: row.state,
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCountData {
    pub tag: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub total_facilities: i64,
    pub total_companies: i64,
    pub by_company: Vec<CompanyCountData>,
    pub by_state: Vec<StateCountData>,
    pub by_tag: Vec<TagCountData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionData {
    pub id: String,
    pub name: String,
    pub states: Vec<String>,
}

impl From<Region> for RegionData {
    fn from(region: Region) -> Self {
        Self {
            id: region.as_str().to_string(),
            name: region.display_name().to_string(),
            states: region.states().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Values the filter UI offers for selection
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptionsData {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub tags: Vec<String>,
    pub regions: Vec<RegionData>,
}

/// Count facilities per normalized tag. A tag repeated on one facility counts once.
pub fn count_tags(tag_lists: &[Vec<String>]) -> Vec<TagCountData> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for tags in tag_lists {
        for tag in normalize_tags(tags) {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut out: Vec<TagCountData> = counts
        .into_iter()
        .map(|(tag, count)| TagCountData { tag, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    out
}
