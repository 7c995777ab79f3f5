pub mod catalog;
pub mod fields;
pub mod identity;
pub mod log_record;
pub mod metrics;
pub mod moderation;
pub mod overrides;
pub mod pipeline;
pub mod poster;
pub mod ranking;

pub use catalog::{dedupe_by_id, parse_catalog_results};
pub use identity::{resolve, resolve_all};
pub use log_record::{is_media_only, review_text, rewatch_count};
pub use metrics::{
    extract_added_timestamp, extract_genre_ids, extract_rating, extract_release_timestamp,
    extract_runtime_minutes,
};
pub use moderation::{filter_catalog, is_query_banned, moderate, Decision, ModerationPolicy, Rule, Verdict};
pub use overrides::{load_poster_overrides, override_batch, parse_override_response, LookupError, PosterOverrideLookup};
pub use pipeline::{Engine, GridItem, GridView};
pub use poster::{catalog_poster_url, expand_poster_path, resolve_poster};
pub use ranking::{rank, rank_indices, sort_metric};
