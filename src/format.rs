//! Display helpers for record text.

use crate::constants::{NO_UPDATES_TEXT, TWO_DIGIT_YEAR_PIVOT, UPDATE_PREVIEW_CHARS};
use chrono::NaiveDate;

/// Full-year formats tried after the two-digit-year pattern
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y", "%d %B %Y"];

/// Shorten update text for a table cell.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn format_update_text(updates: &str) -> String {
    if updates.is_empty() {
        return NO_UPDATES_TEXT.to_string();
    }

    match updates.char_indices().nth(UPDATE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &updates[..cut]),
        None => updates.to_string(),
    }
}

/// Parse a sheet date such as "28 Sep 23" or "2023-09-28".
///
/// Two-digit years use [`TWO_DIGIT_YEAR_PIVOT`]: a suffix comparing greater
/// than the pivot as text is 19xx, anything else 20xx.
pub fn parse_deployment_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(date) = parse_short_year(cleaned) {
        return Some(date);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cleaned, format).ok())
}

/// "D Mon YY" / "DD Mon YY"
fn parse_short_year(cleaned: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let shape_ok = (1..=2).contains(&day.len())
        && day.chars().all(|c| c.is_ascii_digit())
        && month.chars().count() == 3
        && month.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && year.len() == 2
        && year.chars().all(|c| c.is_ascii_digit());
    if !shape_ok {
        return None;
    }

    let century = if *year > TWO_DIGIT_YEAR_PIVOT { "19" } else { "20" };
    let full = format!("{day} {month} {century}{year}");
    NaiveDate::parse_from_str(&full, "%d %b %Y").ok()
}
