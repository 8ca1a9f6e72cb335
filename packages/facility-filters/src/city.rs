//! City derivation from free-form address strings.

/// Derive a city from an address such as `"123 Main St, Springfield, IL 62701"`.
///
/// Takes the second-to-last comma-separated segment and strips a trailing
/// numeric zip fragment (`"Springfield 62701"` → `"Springfield"`).
pub fn derive_city(address: &str) -> Option<String> {
    let segments: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 2 {
        return None;
    }

    let candidate = strip_zip_suffix(segments[segments.len() - 2]);
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

fn strip_zip_suffix(segment: &str) -> &str {
    let trimmed = segment.trim();
    match trimmed.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if is_zip_fragment(tail) => head.trim_end(),
        None if is_zip_fragment(trimmed) => "",
        _ => trimmed,
    }
}

fn is_zip_fragment(s: &str) -> bool {
    !s.is_empty()
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '-')
}
