//! Field validation shared by the company/facility operations and CSV import.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::ValidationError;

pub const MAX_COMPANY_NAME_LEN: usize = 100;

lazy_static! {
    // #RGB or #RRGGBB
    static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap();

    // Letters, digits, spaces and & . , ' - ( ) /
    static ref COMPANY_NAME_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{N} &.,'\-()/]+$").unwrap();
}

pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_REGEX.is_match(color)
}

/// Trim and check a legend color.
pub fn validate_legend_color(color: &str) -> Result<String, ValidationError> {
    let color = color.trim();
    if color.is_empty() {
        return Err(ValidationError::field("legend_color", "is required"));
    }
    if !is_valid_hex_color(color) {
        return Err(ValidationError::field(
            "legend_color",
            format!("invalid format '{}' (expected #RGB or #RRGGBB)", color),
        ));
    }
    Ok(color.to_string())
}

/// Trim and check a company name.
pub fn validate_company_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::field("company_name", "is required"));
    }
    if name.chars().count() > MAX_COMPANY_NAME_LEN {
        return Err(ValidationError::field(
            "company_name",
            format!("must be at most {} characters", MAX_COMPANY_NAME_LEN),
        ));
    }
    if !COMPANY_NAME_REGEX.is_match(name) {
        return Err(ValidationError::field(
            "company_name",
            "may only contain letters, numbers, spaces and & . , ' - ( ) /",
        ));
    }
    Ok(name.to_string())
}
