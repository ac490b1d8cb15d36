//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write;

/// Format a canonical `YYYY-MM-DD` publication date for display.
///
/// Dates that are not in canonical form (free-text `pubDate` values) and
/// format strings chrono cannot apply to a plain date are returned unchanged.
///
/// # Examples
/// ```ignore
/// format_pub_date("2024-03-05", "%Y年%m月%d日") // -> "2024年03月05日"
/// ```
pub fn format_pub_date(pub_date: &str, format: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(pub_date, "%Y-%m-%d") else {
        return pub_date.to_string();
    };

    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return pub_date.to_string();
    }

    let mut out = String::new();
    if write!(out, "{}", date.format_with_items(items.iter())).is_err() {
        return pub_date.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pub_date() {
        assert_eq!(format_pub_date("2024-03-05", "%Y-%m-%d"), "2024-03-05");
        assert_eq!(format_pub_date("2024-03-05", "%Y年%m月%d日"), "2024年03月05日");
        assert_eq!(format_pub_date("2024-03-05", "%B %d, %Y"), "March 05, 2024");
    }

    #[test]
    fn test_free_text_date_unchanged() {
        assert_eq!(format_pub_date("Spring 2024", "%Y"), "Spring 2024");
    }

    #[test]
    fn test_unusable_format_falls_back() {
        assert_eq!(format_pub_date("2024-03-05", "%Q"), "2024-03-05");
        assert_eq!(format_pub_date("2024-03-05", "%H:%M"), "2024-03-05");
    }
}
