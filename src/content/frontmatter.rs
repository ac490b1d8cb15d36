//! Front-matter parsing
//!
//! Front matter is loosely typed: `pubDate` may be a YAML timestamp or a free
//! string, `tags` may be a list or a single label, and any field may carry a
//! value of the wrong type. Every field is decoded on its own so one bad value
//! only costs that field its default.

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Publication date used when front matter has none or an unusable one
pub const FALLBACK_PUB_DATE: &str = "2024-01-01";

lazy_static! {
    // YAML 1.1 timestamp: date, optionally followed by a time and a zone
    static ref TIMESTAMP: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:(?:[Tt]|[ \t]+)(\d{1,2}):(\d{2}):(\d{2})(?:\.\d*)?(?:[ \t]*(Z|[-+]\d{1,2}(?::?\d{2})?))?)?$"
    )
    .unwrap();

    // A quoted `pubDate` is a plain string, whatever it looks like
    static ref QUOTED_PUB_DATE: Regex = Regex::new(r#"(?m)^pubDate[ \t]*:[ \t]*["']"#).unwrap();
}

/// The `pubDate` field as written in the document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PubDate {
    /// Field absent, null or blank
    #[default]
    Missing,
    /// A YAML timestamp, reduced to its calendar date
    Date(NaiveDate),
    /// Any other string, kept verbatim
    Text(String),
    /// A value of the wrong type, or a timestamp naming an impossible date
    Invalid,
}

impl PubDate {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Null => PubDate::Missing,
            Value::String(s) => Self::from_scalar(s),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            _ => PubDate::Invalid,
        }
    }

    fn from_scalar(s: String) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return PubDate::Missing;
        }
        if TIMESTAMP.is_match(trimmed) {
            return match parse_timestamp(trimmed) {
                Some(date) => PubDate::Date(date),
                None => PubDate::Invalid,
            };
        }
        PubDate::Text(s)
    }

    /// Canonical string form used for storage and ordering
    pub fn to_canonical(&self) -> String {
        match self {
            PubDate::Date(date) => date.format("%Y-%m-%d").to_string(),
            PubDate::Text(text) => text.clone(),
            PubDate::Missing | PubDate::Invalid => FALLBACK_PUB_DATE.to_string(),
        }
    }
}

/// Resolve a YAML timestamp to the UTC calendar date it names
fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    let caps = TIMESTAMP.captures(s)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?;

    let Some(hour) = num(4) else {
        return Some(date);
    };
    let time = NaiveTime::from_hms_opt(hour, num(5)?, num(6)?)?;
    let local = NaiveDateTime::new(date, time);

    let offset = match caps.get(7).map(|m| m.as_str()) {
        None | Some("Z") => Duration::zero(),
        Some(zone) => parse_offset(zone)?,
    };

    Some((local - offset).date())
}

/// Parse `+8`, `+08`, `-0530` or `+05:30`
fn parse_offset(zone: &str) -> Option<Duration> {
    let (sign, digits) = match zone.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    let (hours, minutes) = if digits.len() > 2 {
        let (h, m) = digits.split_at(digits.len() - 2);
        (h.parse::<i64>().ok()?, m.parse::<i64>().ok()?)
    } else {
        (digits.parse::<i64>().ok()?, 0)
    };
    Some(Duration::minutes(sign * (hours * 60 + minutes)))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(value))
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
        _ => None,
    }
}

fn lenient_pub_date<'de, D>(deserializer: D) -> Result<PubDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(PubDate::from_value(value))
}

/// Accepts a list of labels or a single label; anything else is an empty set
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Sequence(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    };
    Ok(tags)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "pubDate", deserialize_with = "lenient_pub_date")]
    pub pub_date: PubDate,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    #[serde(rename = "heroImage", deserialize_with = "lenient_string")]
    pub hero_image: Option<String>,
}

impl FrontMatter {
    /// Split a document into its YAML block and body.
    ///
    /// Returns `None` when the document does not open with a `---` fence or
    /// the fence is never closed.
    pub fn split(content: &str) -> Option<(&str, &str)> {
        let content = content.trim_start_matches('\u{feff}');
        let rest = content.strip_prefix("---")?;
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))?;

        let (yaml, after_fence) = match rest.strip_prefix("---") {
            Some(after) => ("", after),
            None => {
                let end = rest.find("\n---")?;
                (&rest[..end], &rest[end + 4..])
            }
        };

        // Drop whatever trails the closing fence on its line
        let body = match after_fence.find('\n') {
            Some(pos) => &after_fence[pos + 1..],
            None => "",
        };

        Some((yaml, body))
    }

    /// Decode a YAML front-matter block
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        let mut fm: FrontMatter = serde_yaml::from_str(yaml)?;

        // serde_yaml does not report scalar style, so check the source text
        if QUOTED_PUB_DATE.is_match(yaml) {
            let value: Value = serde_yaml::from_str(yaml)?;
            if let Some(text) = value.get("pubDate").and_then(Value::as_str) {
                fm.pub_date = if text.trim().is_empty() {
                    PubDate::Missing
                } else {
                    PubDate::Text(text.to_string())
                };
            }
        }

        Ok(fm)
    }

    /// Tags with blanks removed and duplicates collapsed, first occurrence kept
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (FrontMatter, &str) {
        let (yaml, body) = FrontMatter::split(content).unwrap();
        (FrontMatter::from_yaml(yaml).unwrap(), body)
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
description: First post
pubDate: 2024-03-05
tags:
  - rust
  - blog
heroImage: /images/hero.png
---

This is the content.
"#;

        let (fm, body) = parse(content);
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.description, Some("First post".to_string()));
        assert_eq!(fm.pub_date, PubDate::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
        assert_eq!(fm.pub_date.to_canonical(), "2024-03-05");
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.hero_image, Some("/images/hero.png".to_string()));
        assert!(body.contains("This is the content."));
        assert!(!body.contains("---"));
    }

    #[test]
    fn test_timestamp_is_reduced_to_utc_date() {
        let (fm, _) = parse("---\npubDate: 2024-03-05 10:30:00\n---\n");
        assert_eq!(fm.pub_date.to_canonical(), "2024-03-05");

        let (fm, _) = parse("---\npubDate: 2024-03-05T02:00:00+08:00\n---\n");
        assert_eq!(fm.pub_date.to_canonical(), "2024-03-04");

        let (fm, _) = parse("---\npubDate: 2024-03-05t23:30:00-05:00\n---\n");
        assert_eq!(fm.pub_date.to_canonical(), "2024-03-06");
    }

    #[test]
    fn test_string_date_kept_verbatim() {
        let (fm, _) = parse("---\npubDate: March 5, 2024\n---\n");
        assert_eq!(fm.pub_date, PubDate::Text("March 5, 2024".to_string()));
        assert_eq!(fm.pub_date.to_canonical(), "March 5, 2024");
    }

    #[test]
    fn test_quoted_timestamp_kept_verbatim() {
        let fm = FrontMatter::from_yaml("pubDate: \"2024-03-05T02:00:00+08:00\"").unwrap();
        assert_eq!(fm.pub_date.to_canonical(), "2024-03-05T02:00:00+08:00");

        let fm = FrontMatter::from_yaml("title: x\npubDate: '2024-03-05'\n").unwrap();
        assert_eq!(fm.pub_date, PubDate::Text("2024-03-05".to_string()));
    }

    #[test]
    fn test_missing_or_invalid_date_falls_back() {
        let (fm, _) = parse("---\ntitle: x\n---\n");
        assert_eq!(fm.pub_date, PubDate::Missing);
        assert_eq!(fm.pub_date.to_canonical(), FALLBACK_PUB_DATE);

        let (fm, _) = parse("---\npubDate: 2024-13-45\n---\n");
        assert_eq!(fm.pub_date, PubDate::Invalid);
        assert_eq!(fm.pub_date.to_canonical(), FALLBACK_PUB_DATE);

        let (fm, _) = parse("---\npubDate: [1, 2]\n---\n");
        assert_eq!(fm.pub_date.to_canonical(), FALLBACK_PUB_DATE);

        let (fm, _) = parse("---\npubDate: ''\n---\n");
        assert_eq!(fm.pub_date.to_canonical(), FALLBACK_PUB_DATE);
    }

    #[test]
    fn test_parse_single_string_tag() {
        let (fm, _) = parse("---\ntags: Notes\n---\n");
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_wrong_typed_field_only_defaults_itself() {
        let content = "---\ntitle: Kept\ntags: {a: 1}\nheroImage: [x]\n---\nbody\n";
        let (fm, body) = parse(content);
        assert_eq!(fm.title, Some("Kept".to_string()));
        assert!(fm.tags.is_empty());
        assert_eq!(fm.hero_image, None);
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_normalized_tags() {
        let fm = FrontMatter {
            tags: vec![
                "rust".to_string(),
                " ".to_string(),
                "web".to_string(),
                "rust".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(fm.normalized_tags(), vec!["rust", "web"]);
    }

    #[test]
    fn test_split_without_frontmatter() {
        assert!(FrontMatter::split("# Just markdown\n").is_none());
        assert!(FrontMatter::split("---\ntitle: never closed\n").is_none());
    }

    #[test]
    fn test_split_empty_block() {
        let (yaml, body) = FrontMatter::split("---\n---\nbody").unwrap();
        assert_eq!(yaml, "");
        assert_eq!(body, "body");
        assert!(FrontMatter::from_yaml(yaml).unwrap().title.is_none());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let (yaml, body) = FrontMatter::split("---\ntitle: [unclosed\n---\nbody\n").unwrap();
        assert!(FrontMatter::from_yaml(yaml).is_err());
        assert_eq!(body, "body\n");
    }
}
