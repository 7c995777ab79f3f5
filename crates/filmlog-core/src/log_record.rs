// Accessors for watch/review log records from the logging service

use serde_json::Value;

use crate::fields::{coerce_number, first_field, non_blank_str};

const REVIEW_FIELDS: &[&str] = &["review", "reviewText"];

/// How many times the user re-watched the film in this log
///
/// `rewatchCount` wins; a boolean `rewatch` flag counts as one.
pub fn rewatch_count(record: &Value) -> u32 {
    let count = match first_field(record, &["rewatchCount", "rewatch"]) {
        Some(Value::Bool(flag)) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Some(other) => coerce_number(other).unwrap_or(0.0),
        None => 0.0,
    };
    if count.is_finite() && count > 0.0 {
        count.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Written review text, or None when the log carries only media
///
/// `sentinels` are the placeholder values the client writes for
/// "media only" logs; matching is case-insensitive.
pub fn review_text<'a>(record: &'a Value, sentinels: &[String]) -> Option<&'a str> {
    let text = first_field(record, REVIEW_FIELDS).and_then(non_blank_str)?;
    if is_media_only(text, sentinels) {
        None
    } else {
        Some(text)
    }
}

pub fn is_media_only(text: &str, sentinels: &[String]) -> bool {
    let text = text.trim();
    sentinels.iter().any(|s| s.trim().eq_ignore_ascii_case(text))
}
