use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::movie_ref::MovieRef;

/// Width class understood by the catalog image CDN
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PosterSize {
    #[serde(rename = "w92")]
    W92,
    #[serde(rename = "w154")]
    W154,
    #[serde(rename = "w185")]
    W185,
    #[default]
    #[serde(rename = "w342")]
    W342,
    #[serde(rename = "w500")]
    W500,
    #[serde(rename = "w780")]
    W780,
    #[serde(rename = "original")]
    Original,
}

impl PosterSize {
    pub fn token(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

impl fmt::Display for PosterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown poster size: {0}")]
pub struct UnknownPosterSize(pub String);

impl FromStr for PosterSize {
    type Err = UnknownPosterSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w92" => Ok(PosterSize::W92),
            "w154" => Ok(PosterSize::W154),
            "w185" => Ok(PosterSize::W185),
            "w342" => Ok(PosterSize::W342),
            "w500" => Ok(PosterSize::W500),
            "w780" => Ok(PosterSize::W780),
            "original" => Ok(PosterSize::Original),
            other => Err(UnknownPosterSize(other.to_string())),
        }
    }
}

/// Per-user poster overrides, keyed by stringified MovieRef
///
/// Scoped to one viewing user. Deserializes directly from the batch lookup
/// response (`{"27205": "https://..."}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PosterOverrideMap(HashMap<String, String>);

impl PosterOverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, movie: MovieRef, url: impl Into<String>) {
        self.0.insert(movie.key(), url.into());
    }

    /// Override URL for a movie, ignoring blank entries
    pub fn get(&self, movie: MovieRef) -> Option<&str> {
        self.0
            .get(&movie.key())
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MovieRef, String)> for PosterOverrideMap {
    fn from_iter<I: IntoIterator<Item = (MovieRef, String)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(r, url)| (r.key(), url)).collect())
    }
}
