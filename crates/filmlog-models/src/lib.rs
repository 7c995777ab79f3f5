pub mod catalog;
pub mod genre;
pub mod movie_ref;
pub mod poster;
pub mod sorting;

pub use catalog::CatalogEntry;
pub use genre::Genre;
pub use movie_ref::MovieRef;
pub use poster::{PosterOverrideMap, PosterSize, UnknownPosterSize};
pub use sorting::{SortDirection, SortKey};
