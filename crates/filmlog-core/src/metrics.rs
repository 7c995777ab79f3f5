// Numeric sort metrics from loosely encoded watchlist and log records
//
// Every extractor is total: unrecognized encodings come back as `None`
// (or, for ratings, the catalog fallback) instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use filmlog_models::Genre;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::fields::{coerce_number, first_field, first_field_or_movie, movie_object};

const RATING_FIELDS: &[&str] = &["rating", "userRating", "user_rating", "myRating", "stars", "score"];
const CATALOG_AVERAGE_FIELDS: &[&str] = &["vote_average", "voteAverage"];
const RUNTIME_FIELDS: &[&str] = &["runtime", "runtimeMinutes", "duration"];
const RELEASE_FIELDS: &[&str] = &["release_date", "releaseDate", "first_air_date"];
const ADDED_FIELDS: &[&str] = &["addedAt", "createdAt", "watchedAt", "updatedAt"];
const GENRE_FIELDS: &[&str] = &["genre_ids", "genres"];

const MAX_STARS: f64 = 5.0;

static FRACTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)$").unwrap());
static PERCENT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*%$").unwrap());
static ISO_DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^PT(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?$").unwrap()
});
static HOURS_MINUTES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(\d+(?:\.\d+)?)\s*(?:h|hr|hrs|hour|hours))?\s*(?:(\d+(?:\.\d+)?)\s*(?:m|min|mins|minute|minutes))?$",
    )
    .unwrap()
});
static CLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d{1,2})$").unwrap());
static LEADING_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)").unwrap());
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// User rating on the 0-5 scale
///
/// Looks at the record's own rating fields first. Without a usable local
/// rating, falls back to the catalog's 0-10 average halved, and finally to
/// 0; a rating is never reported as missing.
pub fn extract_rating(record: &Value) -> f64 {
    if let Some(rating) = first_field(record, RATING_FIELDS).and_then(parse_rating) {
        return rating;
    }

    first_field_or_movie(record, CATALOG_AVERAGE_FIELDS)
        .and_then(coerce_number)
        .filter(|avg| avg.is_finite() && *avg >= 0.0)
        .map(|avg| (avg / 2.0).min(MAX_STARS))
        .unwrap_or(0.0)
}

/// Parse one rating value in any of the known encodings
pub fn parse_rating(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(normalize_scale),
        Value::String(s) => parse_rating_text(s),
        _ => None,
    }
}

fn parse_rating_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = FRACTION_PATTERN.captures(text) {
        let numerator: f64 = caps[1].parse().ok()?;
        let denominator: f64 = caps[2].parse().ok()?;
        if denominator <= 0.0 {
            return None;
        }
        return Some(clamp_stars(numerator / denominator * MAX_STARS));
    }

    if let Some(caps) = PERCENT_PATTERN.captures(text) {
        let percent: f64 = caps[1].parse().ok()?;
        return Some(clamp_stars(percent / 100.0 * MAX_STARS));
    }

    if text.contains('★') || text.contains('½') {
        let full = text.chars().filter(|c| *c == '★').count() as f64;
        let halves = text.chars().filter(|c| *c == '½').count() as f64;
        let whole = LEADING_NUMBER_PATTERN
            .captures(text)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .unwrap_or(0.0);
        return Some(clamp_stars(whole + full + halves * 0.5));
    }

    text.parse::<f64>().ok().and_then(normalize_scale)
}

/// Bare numbers above the 0-5 range are taken to be on the 0-10 scale
fn normalize_scale(value: f64) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let stars = if value > MAX_STARS { value / 2.0 } else { value };
    Some(clamp_stars(stars))
}

fn clamp_stars(value: f64) -> f64 {
    value.clamp(0.0, MAX_STARS)
}

/// Runtime in minutes, if any runtime field parses
pub fn extract_runtime_minutes(record: &Value) -> Option<f64> {
    first_field_or_movie(record, RUNTIME_FIELDS).and_then(parse_runtime)
}

/// Parse a runtime value: minutes, `PT#H#M`, `#h #m`, or `H:MM`
pub fn parse_runtime(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|m| m.is_finite() && *m >= 0.0),
        Value::String(s) => parse_runtime_text(s),
        _ => None,
    }
}

fn parse_runtime_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DURATION_PATTERN.captures(text) {
        if caps.get(1).is_some() || caps.get(2).is_some() {
            return Some(hours_and_minutes(caps.get(1), caps.get(2)));
        }
        return None;
    }

    if let Some(caps) = HOURS_MINUTES_PATTERN.captures(text) {
        if caps.get(1).is_some() || caps.get(2).is_some() {
            return Some(hours_and_minutes(caps.get(1), caps.get(2)));
        }
    }

    if let Some(caps) = CLOCK_PATTERN.captures(text) {
        let hours: f64 = caps[1].parse().ok()?;
        let minutes: f64 = caps[2].parse().ok()?;
        return Some(hours * 60.0 + minutes);
    }

    text.parse::<f64>().ok().filter(|m| m.is_finite() && *m >= 0.0)
}

fn hours_and_minutes(hours: Option<regex::Match<'_>>, minutes: Option<regex::Match<'_>>) -> f64 {
    let number = |m: Option<regex::Match<'_>>| {
        m.and_then(|m| m.as_str().parse::<f64>().ok()).unwrap_or(0.0)
    };
    number(hours) * 60.0 + number(minutes)
}

/// Release date as epoch milliseconds (UTC midnight for calendar dates)
pub fn extract_release_timestamp(record: &Value) -> Option<f64> {
    first_field_or_movie(record, RELEASE_FIELDS)
        .and_then(Value::as_str)
        .and_then(parse_date_millis)
}

/// When the record was added or logged, as epoch milliseconds
///
/// Accepts date strings, epoch-millisecond numbers and `{seconds}` /
/// `{_seconds}` timestamp objects.
pub fn extract_added_timestamp(record: &Value) -> Option<f64> {
    match first_field(record, ADDED_FIELDS)? {
        Value::String(s) => parse_date_millis(s),
        Value::Number(n) => n.as_f64().filter(|ms| ms.is_finite() && *ms > 0.0),
        Value::Object(obj) => obj
            .get("_seconds")
            .or_else(|| obj.get("seconds"))
            .and_then(coerce_number)
            .filter(|s| s.is_finite())
            .map(|s| s * 1000.0),
        _ => None,
    }
}

/// Parse a calendar date or timestamp string into epoch milliseconds
pub fn parse_date_millis(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64);
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return midnight_millis(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis() as f64);
        }
    }

    if YEAR_PATTERN.is_match(text) {
        let year: i32 = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(midnight_millis);
    }

    None
}

fn midnight_millis(date: NaiveDate) -> Option<f64> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive).timestamp_millis() as f64)
}

/// Genre ids from `genre_ids` / `genres` on the record and its nested movie
///
/// Entries may be ids, numeric strings, genre names or `{id, name}`
/// objects; names go through the fixed catalog genre table.
pub fn extract_genre_ids(record: &Value) -> BTreeSet<u32> {
    let scopes = std::iter::once(record).chain(movie_object(record));
    scopes
        .flat_map(|scope| GENRE_FIELDS.iter().filter_map(move |key| scope.get(*key)))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(genre_id)
        .collect()
}

fn genre_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .ok()
            .or_else(|| Genre::from_name(s).map(|g| g.id())),
        Value::Object(obj) => obj
            .get("id")
            .and_then(genre_id)
            .or_else(|| obj.get("name").and_then(genre_id)),
        _ => None,
    }
}
