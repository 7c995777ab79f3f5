// Batched per-user poster override lookup

use async_trait::async_trait;
use filmlog_models::{MovieRef, PosterOverrideMap};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::identity::resolve;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("override lookup transport error: {0}")]
    Transport(String),

    #[error("override lookup failed with status {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("malformed override lookup response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::MalformedResponse(err.to_string())
    }
}

/// Backend collaborator returning a user's poster overrides for a set of movies
#[async_trait]
pub trait PosterOverrideLookup: Send + Sync {
    async fn lookup(
        &self,
        user_id: &str,
        movie_ids: &[MovieRef],
    ) -> Result<PosterOverrideMap, LookupError>;
}

/// Distinct ids of the visible records, in display order, capped at `cap`
pub fn override_batch(records: &[Value], cap: usize) -> Vec<MovieRef> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(resolve)
        .filter(|movie| seen.insert(*movie))
        .take(cap)
        .collect()
}

/// Fetch overrides for the visible records with a single lookup call
///
/// Failures are logged and degrade to an empty map, so poster resolution
/// falls through to catalog artwork. No retries are attempted here.
pub async fn load_poster_overrides<L>(
    lookup: &L,
    user_id: &str,
    records: &[Value],
    cap: usize,
) -> PosterOverrideMap
where
    L: PosterOverrideLookup + ?Sized,
{
    if user_id.trim().is_empty() {
        debug!("load_poster_overrides: no viewing user, skipping lookup");
        return PosterOverrideMap::new();
    }

    let batch = override_batch(records, cap);
    if batch.is_empty() {
        debug!("load_poster_overrides: no resolvable ids among {} records", records.len());
        return PosterOverrideMap::new();
    }

    match lookup.lookup(user_id, &batch).await {
        Ok(overrides) => {
            debug!(
                "load_poster_overrides: requested={}, overrides={}",
                batch.len(),
                overrides.len()
            );
            overrides
        }
        Err(e) => {
            warn!(
                "Poster override lookup failed for {} ids, using catalog artwork: {}",
                batch.len(),
                e
            );
            PosterOverrideMap::new()
        }
    }
}

/// Parse a lookup response body into an override map
///
/// Non-string values are skipped rather than failing the whole batch.
pub fn parse_override_response(body: &str) -> Result<PosterOverrideMap, LookupError> {
    let value: Value = serde_json::from_str(body)?;
    let object = value
        .as_object()
        .ok_or_else(|| LookupError::MalformedResponse("expected a JSON object".to_string()))?;

    let overrides = object
        .iter()
        .filter_map(|(key, url)| {
            let movie = key.trim().parse::<u64>().ok().and_then(MovieRef::new)?;
            let url = url.as_str()?.trim();
            (!url.is_empty()).then(|| (movie, url.to_string()))
        })
        .collect();

    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingLookup {
        calls: Mutex<Vec<(String, Vec<MovieRef>)>>,
        fail: bool,
    }

    impl RecordingLookup {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl PosterOverrideLookup for RecordingLookup {
        async fn lookup(
            &self,
            user_id: &str,
            movie_ids: &[MovieRef],
        ) -> Result<PosterOverrideMap, LookupError> {
            self.calls
                .lock()
                .unwrap()
                .push((user_id.to_string(), movie_ids.to_vec()));
            if self.fail {
                return Err(LookupError::Backend {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(movie_ids
                .iter()
                .map(|m| (*m, format!("https://cdn.filmlog.app/{}.jpg", m)))
                .collect())
        }
    }

    fn records(count: u64) -> Vec<Value> {
        (1..=count).map(|id| json!({"movie": {"id": id}})).collect()
    }

    #[test]
    fn test_override_batch_dedupes_and_caps() {
        let mut visible = vec![json!({"tmdbId": 5}), json!({"title": "no id"}), json!({"movieId": "5"})];
        visible.extend(records(40));

        let batch = override_batch(&visible, 30);
        assert_eq!(batch.len(), 30);
        assert_eq!(batch[0], MovieRef::new(5).unwrap());
        assert_eq!(batch[1], MovieRef::new(1).unwrap());
        assert_eq!(batch.iter().filter(|m| m.get() == 5).count(), 1);
    }

    #[tokio::test]
    async fn test_load_makes_one_capped_call() {
        let lookup = RecordingLookup::new(false);
        let overrides = load_poster_overrides(&lookup, "user-1", &records(45), 30).await;

        let calls = lookup.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "user-1");
        assert_eq!(calls[0].1.len(), 30);
        assert_eq!(overrides.len(), 30);
        assert_eq!(
            overrides.get(MovieRef::new(30).unwrap()),
            Some("https://cdn.filmlog.app/30.jpg")
        );
        assert_eq!(overrides.get(MovieRef::new(31).unwrap()), None);
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty_map() {
        let lookup = RecordingLookup::new(true);
        let overrides = load_poster_overrides(&lookup, "user-1", &records(3), 30).await;
        assert!(overrides.is_empty());
        assert_eq!(lookup.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_skips_call_without_ids_or_user() {
        let lookup = RecordingLookup::new(false);

        let overrides = load_poster_overrides(&lookup, "user-1", &[json!({"title": "?"})], 30).await;
        assert!(overrides.is_empty());

        let overrides = load_poster_overrides(&lookup, "  ", &records(3), 30).await;
        assert!(overrides.is_empty());

        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_through_trait_object() {
        let lookup: Box<dyn PosterOverrideLookup> = Box::new(RecordingLookup::new(false));
        let overrides = load_poster_overrides(lookup.as_ref(), "user-2", &records(2), 30).await;
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_parse_override_response() {
        let overrides = parse_override_response(
            r#"{"550": "https://cdn.filmlog.app/550.jpg", "13": null, "abc": "https://x", "7": " "}"#,
        )
        .unwrap();
        assert_eq!(overrides.len(), 1);
        assert!(overrides.get(MovieRef::new(550).unwrap()).is_some());

        assert!(matches!(
            parse_override_response("[1, 2]"),
            Err(LookupError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_override_response("not json"),
            Err(LookupError::MalformedResponse(_))
        ));
    }
}
