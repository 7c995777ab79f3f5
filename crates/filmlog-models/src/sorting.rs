use serde::{Deserialize, Serialize};

/// Metric a watchlist or film grid can be ordered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keep the order the backend returned
    Source,
    /// When the record was added to the list (or logged)
    Added,
    /// Catalog release date
    Release,
    /// User rating on the 0-5 scale, falling back to the catalog average
    Rating,
    /// Runtime in minutes
    Runtime,
}

impl SortKey {
    /// Date keys are the ones the backend frequently omits
    pub fn is_date_based(&self) -> bool {
        matches!(self, SortKey::Added | SortKey::Release)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}
