// Screen-facing facade tying moderation, identity, posters and ranking together

use anyhow::Result;
use filmlog_config::EngineConfig;
use filmlog_models::{CatalogEntry, MovieRef, PosterOverrideMap, PosterSize, SortDirection, SortKey};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::{dedupe_by_id, parse_catalog_results};
use crate::identity::resolve;
use crate::log_record::review_text;
use crate::moderation::{filter_catalog, is_query_banned, ModerationPolicy};
use crate::overrides::{load_poster_overrides, PosterOverrideLookup};
use crate::poster::resolve_poster;
use crate::ranking::rank;

/// How a watchlist or film grid should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub genre: Option<u32>,
    /// Defaults to the configured poster size
    pub poster_size: Option<PosterSize>,
}

impl Default for GridView {
    fn default() -> Self {
        Self {
            sort_key: SortKey::Source,
            direction: SortDirection::Descending,
            genre: None,
            poster_size: None,
        }
    }
}

/// One renderable cell of a film grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridItem {
    pub movie: MovieRef,
    pub poster_url: String,
    pub record: Value,
}

/// Configured engine: validated configuration plus the compiled moderation policy
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    policy: ModerationPolicy,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let policy = ModerationPolicy::from_config(&config.moderation);
        Ok(Self { config, policy })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Check a query before any network call is made
    pub fn is_query_banned(&self, query: &str) -> bool {
        is_query_banned(query, &self.policy)
    }

    /// Parse, de-duplicate and moderate a raw catalog search/trending response
    pub fn search_results(&self, response: &Value) -> Vec<CatalogEntry> {
        let entries = dedupe_by_id(parse_catalog_results(response));
        filter_catalog(&entries, &self.policy)
    }

    /// Review text of a log, hiding the configured "media only" placeholders
    pub fn review_text<'a>(&self, record: &'a Value) -> Option<&'a str> {
        review_text(record, &self.config.logs.media_only_sentinels)
    }

    /// Fetch the viewing user's overrides for the first visible records
    pub async fn load_overrides<L>(&self, lookup: &L, user_id: &str, records: &[Value]) -> PosterOverrideMap
    where
        L: PosterOverrideLookup + ?Sized,
    {
        load_poster_overrides(lookup, user_id, records, self.config.overrides.batch_cap).await
    }

    /// Rank records for a grid and attach identity and artwork
    ///
    /// Records without a resolvable identity cannot be rendered as a film
    /// and are left out.
    pub fn film_grid(&self, records: &[Value], view: &GridView, overrides: &PosterOverrideMap) -> Vec<GridItem> {
        let size = view.poster_size.unwrap_or(self.config.poster.default_size);
        let ranked = rank(records, view.sort_key, view.direction, view.genre, &self.config.ranking);
        let ranked_count = ranked.len();

        let items: Vec<GridItem> = ranked
            .into_iter()
            .filter_map(|record| {
                let movie = resolve(&record)?;
                let poster_url = resolve_poster(Some(movie), overrides, &record, size, &self.config.poster);
                Some(GridItem { movie, poster_url, record })
            })
            .collect();

        if items.len() < ranked_count {
            debug!(
                "film_grid: dropped {} records with no valid identifier",
                ranked_count - items.len()
            );
        }

        items
    }
}
