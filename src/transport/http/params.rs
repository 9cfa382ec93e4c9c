//! Typed coercion of raw query/form values.

use crate::domain::{PageRequest, ValidationError};

/// Treats absent and blank values alike.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// A row id: a positive integer.
pub fn parse_id(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::Malformed {
            field,
            expected: "a positive integer id",
            value: raw.to_string(),
        }),
    }
}

/// Absent or blank means page 1; pages below 1 are clamped.
pub fn parse_page(raw: Option<&str>) -> Result<PageRequest, ValidationError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(PageRequest::default());
    };
    let n = raw.parse::<i64>().map_err(|_| ValidationError::Malformed {
        field: "page",
        expected: "a whole number",
        value: raw.to_string(),
    })?;
    let page = u32::try_from(n.max(1)).unwrap_or(u32::MAX);
    Ok(PageRequest::new(page))
}

/// The hidden form id. Absent, blank and `0` select insert.
pub fn parse_form_id(raw: Option<&str>) -> Result<Option<i32>, ValidationError> {
    match non_blank(raw) {
        None | Some("0") => Ok(None),
        Some(v) => parse_id("id", v).map(Some),
    }
}
