// Canonical movie identity extraction across heterogeneous record shapes

use filmlog_models::MovieRef;
use serde_json::Value;
use tracing::debug;

use crate::fields::{coerce_number, movie_object};

/// Accessors tried in order; the first one that yields a value is a candidate
const CANDIDATES: [fn(&Value) -> Option<&Value>; 7] = [
    top_level_tmdb_id,
    nested_tmdb_id,
    nested_id,
    bare_movie,
    movie_id,
    record_id,
    bare_id,
];

fn top_level_tmdb_id(record: &Value) -> Option<&Value> {
    record.get("tmdbId")
}

fn nested_tmdb_id(record: &Value) -> Option<&Value> {
    movie_object(record).and_then(|m| m.get("tmdbId"))
}

fn nested_id(record: &Value) -> Option<&Value> {
    movie_object(record).and_then(|m| m.get("id"))
}

/// `movie` holding the id itself rather than an object
fn bare_movie(record: &Value) -> Option<&Value> {
    record.get("movie").filter(|m| m.is_number() || m.is_string())
}

fn movie_id(record: &Value) -> Option<&Value> {
    record.get("movieId")
}

fn record_id(record: &Value) -> Option<&Value> {
    record.get("id")
}

/// The record itself, when it is a bare number or an all-digit string
fn bare_id(record: &Value) -> Option<&Value> {
    match record {
        Value::Number(_) => Some(record),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Some(record),
        _ => None,
    }
}

/// Resolve the catalog movie id of any log, list, watchlist or catalog record
///
/// Candidates are evaluated lazily in a fixed order. A candidate that is
/// present but does not coerce to a positive integer is skipped and the
/// next one is tried; each candidate is looked at once.
pub fn resolve(record: &Value) -> Option<MovieRef> {
    CANDIDATES
        .iter()
        .filter_map(|accessor| accessor(record))
        .filter(|candidate| !candidate.is_null())
        .find_map(|candidate| coerce_number(candidate).and_then(MovieRef::from_f64))
}

/// Resolve a batch, returning `(index, id)` for every record that has an identity
///
/// Records without one are skipped and logged.
pub fn resolve_all(records: &[Value]) -> Vec<(usize, MovieRef)> {
    let mut resolved = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (index, record) in records.iter().enumerate() {
        match resolve(record) {
            Some(movie) => resolved.push((index, movie)),
            None => {
                skipped += 1;
                if skipped <= 5 {
                    debug!(index, "resolve_all: skipping record with no valid identifier");
                }
            }
        }
    }

    if skipped > 0 {
        debug!(
            "resolve_all: resolved={}, skipped_no_identifier={}",
            resolved.len(),
            skipped
        );
    }

    resolved
}
