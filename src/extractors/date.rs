//! Publication date extraction.
//!
//! Sources, first success wins:
//! 1. `datePublished` in an `application/ld+json` block
//! 2. `<meta property="article:published_time">`
//! 3. the first `<time>` element: its `datetime` attribute, or failing that
//!    its visible text (display date only, no ISO value)
//!
//! A trailing `Z` is read as `+00:00`. Timestamps without an offset are taken
//! as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static JSON_LD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']").expect("valid json-ld selector")
});
static PUBLISHED_META: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='article:published_time'][content]")
        .expect("valid published_time selector")
});
static TIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect("valid time selector"));

const DISPLAY_FORMAT: &str = "%B %d, %Y";

/// Offsets RFC 3339 rejects: compact `+0000`, or no seconds.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// The resolved publication date of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedDate {
    /// The source string as found (trimmed), when it parsed.
    pub iso: Option<String>,
    /// `Month DD, YYYY`, or raw `<time>` text.
    pub display: Option<String>,
}

impl PublishedDate {
    fn parsed(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let timestamp = parse_iso_timestamp(raw)?;
        Some(PublishedDate {
            iso: Some(raw.to_string()),
            display: Some(format_display_date(timestamp.date_naive())),
        })
    }
}

pub fn extract_published_date(document: &Html) -> PublishedDate {
    from_json_ld(document)
        .or_else(|| from_meta(document))
        .or_else(|| from_time_element(document))
        .unwrap_or_default()
}

fn from_json_ld(document: &Html) -> Option<PublishedDate> {
    document.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(json) => date_published(&json).and_then(PublishedDate::parsed),
            Err(e) => {
                debug!(error = %e, "Ignoring unparseable JSON-LD block");
                None
            }
        }
    })
}

/// Find `datePublished` on the top-level object, in a top-level array, or
/// inside an `@graph`.
fn date_published(json: &Value) -> Option<&str> {
    match json {
        Value::Object(map) => map
            .get("datePublished")
            .and_then(Value::as_str)
            .or_else(|| map.get("@graph").and_then(date_published)),
        Value::Array(items) => items.iter().find_map(date_published),
        _ => None,
    }
}

fn from_meta(document: &Html) -> Option<PublishedDate> {
    let content = document.select(&PUBLISHED_META).next()?.value().attr("content")?;
    PublishedDate::parsed(content)
}

fn from_time_element(document: &Html) -> Option<PublishedDate> {
    let time = document.select(&TIME).next()?;
    if let Some(parsed) = time.value().attr("datetime").and_then(PublishedDate::parsed) {
        return Some(parsed);
    }
    let text = time.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        return None;
    }
    Some(PublishedDate {
        iso: None,
        display: Some(text),
    })
}

/// Parse an ISO-8601 date or timestamp into a fixed-offset datetime.
pub fn parse_iso_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Some(dt);
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Inverse of [`format_display_date`].
pub fn parse_display_date(display: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(display.trim(), DISPLAY_FORMAT).ok()
}
