use anyhow::Context;
use filmlog_models::PosterSize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Engine configuration, loaded once at process start and shared read-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub moderation: ModerationConfig,
    #[serde(default)]
    pub poster: PosterConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub overrides: OverrideConfig,
    #[serde(default)]
    pub logs: LogRecordConfig,
}

/// Content moderation lists and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Catalog ids that are always shown
    #[serde(default)]
    pub allow_ids: Vec<u64>,
    /// Catalog ids that are never shown (unless also allowed)
    #[serde(default)]
    pub deny_ids: Vec<u64>,
    #[serde(default = "default_banned_keywords")]
    pub banned_keywords: Vec<String>,
    #[serde(default = "default_always_allowed_languages")]
    pub always_allowed_languages: Vec<String>,
    #[serde(default = "default_always_allowed_countries")]
    pub always_allowed_countries: Vec<String>,
    #[serde(default = "default_south_asian_languages")]
    pub south_asian_languages: Vec<String>,
    #[serde(default = "default_east_asian_languages")]
    pub east_asian_languages: Vec<String>,
    /// Languages exempt from the foreign-language vote floor
    #[serde(default = "default_open_languages")]
    pub open_languages: Vec<String>,
    #[serde(default = "default_south_asian_min_votes")]
    pub south_asian_min_votes: u64,
    #[serde(default = "default_east_asian_min_votes")]
    pub east_asian_min_votes: u64,
    #[serde(default = "default_foreign_min_votes")]
    pub foreign_min_votes: u64,
    #[serde(default = "default_obscure_max_votes")]
    pub obscure_max_votes: u64,
    #[serde(default = "default_obscure_max_popularity")]
    pub obscure_max_popularity: f64,
    #[serde(default = "default_min_reputation")]
    pub min_reputation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterConfig {
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    #[serde(default)]
    pub default_size: PosterSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Absolute floor of records that must carry a date metric before sorting by it
    #[serde(default = "default_min_sample")]
    pub min_sample: usize,
    /// Fraction of records that must carry a date metric before sorting by it
    #[serde(default = "default_min_sample_ratio")]
    pub min_sample_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Max number of visible ids sent in one poster override lookup
    #[serde(default = "default_batch_cap")]
    pub batch_cap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecordConfig {
    /// Review values meaning "this log only has media attached"
    #[serde(default = "default_media_only_sentinels")]
    pub media_only_sentinels: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_banned_keywords() -> Vec<String> {
    strings(&[
        "xxx", "porn", "hentai", "erotic", "nude", "nudity", "playboy", "stripper", "sexploitation",
        "softcore", "hardcore sex", "onlyfans",
    ])
}

fn default_always_allowed_languages() -> Vec<String> {
    strings(&["ar"])
}

fn default_always_allowed_countries() -> Vec<String> {
    strings(&["SA"])
}

fn default_south_asian_languages() -> Vec<String> {
    strings(&["hi", "ta", "te", "ml", "kn", "bn", "mr", "pa", "ur", "gu", "or", "si", "ne"])
}

fn default_east_asian_languages() -> Vec<String> {
    strings(&["ja", "ko", "zh", "cn", "th", "vi", "id", "tl", "ms"])
}

fn default_open_languages() -> Vec<String> {
    strings(&["en", "es"])
}

fn default_south_asian_min_votes() -> u64 {
    2000
}

fn default_east_asian_min_votes() -> u64 {
    5000
}

fn default_foreign_min_votes() -> u64 {
    2000
}

fn default_obscure_max_votes() -> u64 {
    50
}

fn default_obscure_max_popularity() -> f64 {
    5.0
}

fn default_min_reputation() -> f64 {
    300.0
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/".to_string()
}

fn default_fallback_url() -> String {
    "https://filmlog.app/static/poster-placeholder.png".to_string()
}

fn default_min_sample() -> usize {
    5
}

fn default_min_sample_ratio() -> f64 {
    0.2
}

fn default_batch_cap() -> usize {
    30
}

fn default_media_only_sentinels() -> Vec<String> {
    strings(&["__media_only__", "[media]", "[photo]"])
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            allow_ids: Vec::new(),
            deny_ids: Vec::new(),
            banned_keywords: default_banned_keywords(),
            always_allowed_languages: default_always_allowed_languages(),
            always_allowed_countries: default_always_allowed_countries(),
            south_asian_languages: default_south_asian_languages(),
            east_asian_languages: default_east_asian_languages(),
            open_languages: default_open_languages(),
            south_asian_min_votes: default_south_asian_min_votes(),
            east_asian_min_votes: default_east_asian_min_votes(),
            foreign_min_votes: default_foreign_min_votes(),
            obscure_max_votes: default_obscure_max_votes(),
            obscure_max_popularity: default_obscure_max_popularity(),
            min_reputation: default_min_reputation(),
        }
    }
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            image_base_url: default_image_base_url(),
            fallback_url: default_fallback_url(),
            default_size: PosterSize::default(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_sample: default_min_sample(),
            min_sample_ratio: default_min_sample_ratio(),
        }
    }
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            batch_cap: default_batch_cap(),
        }
    }
}

impl Default for LogRecordConfig {
    fn default() -> Self {
        Self {
            media_only_sentinels: default_media_only_sentinels(),
        }
    }
}

impl ModerationConfig {
    /// Lowercase keywords and codes so matching never has to
    fn normalize(&mut self) {
        let lower = |values: &mut Vec<String>| {
            for v in values.iter_mut() {
                *v = v.trim().to_lowercase();
            }
        };
        lower(&mut self.banned_keywords);
        lower(&mut self.always_allowed_languages);
        lower(&mut self.always_allowed_countries);
        lower(&mut self.south_asian_languages);
        lower(&mut self.east_asian_languages);
        lower(&mut self.open_languages);
    }
}

impl EngineConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.moderation.normalize();
        info!(
            "Loaded engine config from {} ({} allowed ids, {} denied ids, {} banned keywords)",
            path.display(),
            config.moderation.allow_ids.len(),
            config.moderation.deny_ids.len(),
            config.moderation.banned_keywords.len()
        );
        Ok(config)
    }

    /// Load the config if the file exists, otherwise use built-in defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No engine config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poster.fallback_url.trim().is_empty() {
            return Err(anyhow::anyhow!("poster.fallback_url must not be empty"));
        }
        if self.poster.image_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("poster.image_base_url must not be empty"));
        }
        let ratio = self.ranking.min_sample_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(anyhow::anyhow!(
                "ranking.min_sample_ratio must be within (0, 1], got {}",
                ratio
            ));
        }
        if self.overrides.batch_cap == 0 {
            return Err(anyhow::anyhow!("overrides.batch_cap must be greater than zero"));
        }
        if self.moderation.banned_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(anyhow::anyhow!("moderation.banned_keywords contains a blank keyword"));
        }

        // Allow-list wins at runtime, but an id on both lists is almost always a mistake
        let denied: HashSet<u64> = self.moderation.deny_ids.iter().copied().collect();
        let overlap: Vec<u64> = self
            .moderation
            .allow_ids
            .iter()
            .copied()
            .filter(|id| denied.contains(id))
            .collect();
        if !overlap.is_empty() {
            warn!("Ids present on both allow and deny lists (allow wins): {:?}", overlap);
        }

        Ok(())
    }
}
