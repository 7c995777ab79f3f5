// Poster artwork selection under per-user override precedence

use filmlog_config::PosterConfig;
use filmlog_models::{CatalogEntry, MovieRef, PosterOverrideMap, PosterSize};
use serde_json::Value;

use crate::fields::{movie_object, non_blank_str};

const OVERRIDE_FIELDS: &[&str] = &["posterOverride", "poster_override"];
const PATH_FIELDS: &[&str] = &["poster_path", "posterPath"];
const URL_FIELDS: &[&str] = &["posterUrl", "poster_url", "poster"];

/// Pick the poster URL for a record
///
/// Precedence, first non-empty wins:
/// 1. the viewing user's override for `movie`
/// 2. an override embedded on the record
/// 3. the record's (or nested movie's) catalog poster, sized with `size`
/// 4. the configured fallback image
///
/// Never performs I/O; `overrides` must already be populated by the caller.
pub fn resolve_poster(
    movie: Option<MovieRef>,
    overrides: &PosterOverrideMap,
    record: &Value,
    size: PosterSize,
    settings: &PosterConfig,
) -> String {
    if let Some(url) = movie.and_then(|m| overrides.get(m)) {
        return url.trim().to_string();
    }

    if let Some(url) = first_non_blank(record, OVERRIDE_FIELDS) {
        return url.to_string();
    }

    record_poster(record, size, settings).unwrap_or_else(|| settings.fallback_url.clone())
}

/// Catalog artwork for a typed search result (tiers 3 and 4 only)
pub fn catalog_poster_url(entry: &CatalogEntry, size: PosterSize, settings: &PosterConfig) -> String {
    let path = entry.poster_path.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let url = entry.poster_url.as_deref().map(str::trim).filter(|s| !s.is_empty());
    path.or(url)
        .map(|p| expand_poster_path(p, size, settings))
        .unwrap_or_else(|| settings.fallback_url.clone())
}

/// Expand a relative catalog poster path; absolute URLs are returned as-is
pub fn expand_poster_path(path: &str, size: PosterSize, settings: &PosterConfig) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }
    format!(
        "{}/{}/{}",
        settings.image_base_url.trim_end_matches('/'),
        size.token(),
        path.trim_start_matches('/')
    )
}

fn record_poster(record: &Value, size: PosterSize, settings: &PosterConfig) -> Option<String> {
    let scopes = std::iter::once(record).chain(movie_object(record));
    for scope in scopes {
        if let Some(path) = first_non_blank(scope, PATH_FIELDS) {
            return Some(expand_poster_path(path, size, settings));
        }
        if let Some(url) = first_non_blank(scope, URL_FIELDS).filter(|u| is_absolute_url(u)) {
            return Some(url.to_string());
        }
    }
    None
}

fn first_non_blank<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(non_blank_str)
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}
