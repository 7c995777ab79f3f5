use serde::{Deserialize, Deserializer, Serialize};

/// A search or trending result from the external metadata catalog
///
/// Every field defaults when absent or null so that partially populated
/// results still deserialize; moderation decides what to do with the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(alias = "name", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(alias = "original_name", deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_country: Vec<String>,
    pub poster_path: Option<String>,
    /// Absolute artwork URL, present on some proxied responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(alias = "first_air_date", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogEntry {
    /// True when either a relative poster path or an absolute poster URL is set
    pub fn has_poster(&self) -> bool {
        let present = |value: &Option<String>| {
            value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
        };
        present(&self.poster_path) || present(&self.poster_url)
    }

    /// Crude reputation score: average vote weighted by vote count
    pub fn reputation(&self) -> f64 {
        self.vote_average * self.vote_count as f64
    }
}
