//! Tag normalization and any/all matching.

use serde::{Deserialize, Serialize};

/// Whether a facility must carry every wanted tag or just one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatch {
    #[default]
    Any,
    All,
}

impl TagMatch {
    pub fn from_match_all(match_all: bool) -> Self {
        if match_all {
            Self::All
        } else {
            Self::Any
        }
    }
}

/// Lowercase, trim and collapse inner whitespace.
pub fn normalize_tag(tag: &str) -> String {
    tag.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split a comma-separated tag cell into trimmed, non-empty tags.
///
/// Original casing is preserved; matching normalizes on its own.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize and dedupe a list of tags, keeping first-seen order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let normalized = normalize_tag(tag.as_ref());
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// Check `have` against `wanted`. An empty `wanted` list matches everything.
pub fn matches_tags<H: AsRef<str>, W: AsRef<str>>(have: &[H], wanted: &[W], mode: TagMatch) -> bool {
    let wanted = normalize_tags(wanted);
    if wanted.is_empty() {
        return true;
    }

    let have = normalize_tags(have);
    match mode {
        TagMatch::Any => wanted.iter().any(|w| have.contains(w)),
        TagMatch::All => wanted.iter().all(|w| have.contains(w)),
    }
}
