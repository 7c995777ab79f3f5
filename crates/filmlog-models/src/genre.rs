use serde::{Deserialize, Serialize};

/// Catalog movie genres with their fixed numeric ids
///
/// List documents sometimes carry genre names instead of ids; names are
/// mapped back through this table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    TvMovie,
    Thriller,
    War,
    Western,
}

const ALL: [Genre; 19] = [
    Genre::Action,
    Genre::Adventure,
    Genre::Animation,
    Genre::Comedy,
    Genre::Crime,
    Genre::Documentary,
    Genre::Drama,
    Genre::Family,
    Genre::Fantasy,
    Genre::History,
    Genre::Horror,
    Genre::Music,
    Genre::Mystery,
    Genre::Romance,
    Genre::ScienceFiction,
    Genre::TvMovie,
    Genre::Thriller,
    Genre::War,
    Genre::Western,
];

impl Genre {
    pub fn all() -> &'static [Genre] {
        &ALL
    }

    pub fn id(&self) -> u32 {
        match self {
            Genre::Action => 28,
            Genre::Adventure => 12,
            Genre::Animation => 16,
            Genre::Comedy => 35,
            Genre::Crime => 80,
            Genre::Documentary => 99,
            Genre::Drama => 18,
            Genre::Family => 10751,
            Genre::Fantasy => 14,
            Genre::History => 36,
            Genre::Horror => 27,
            Genre::Music => 10402,
            Genre::Mystery => 9648,
            Genre::Romance => 10749,
            Genre::ScienceFiction => 878,
            Genre::TvMovie => 10770,
            Genre::Thriller => 53,
            Genre::War => 10752,
            Genre::Western => 37,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::TvMovie => "TV Movie",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Case-insensitive name lookup, accepting the common "Sci-Fi" spelling
    pub fn from_name(name: &str) -> Option<Genre> {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "sci-fi" | "scifi" | "sci fi" => return Some(Genre::ScienceFiction),
            _ => {}
        }
        ALL.iter()
            .copied()
            .find(|g| g.name().to_lowercase() == normalized)
    }
}
