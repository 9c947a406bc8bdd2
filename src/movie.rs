//! Movie entity and its identity key.
//!
//! A movie's identity is the (title, year) pair: two catalogue rows with the
//! same title and year are the same movie. The key's derived ordering (title
//! first, then year) is what makes alphabetical browsing and letter-range
//! queries possible.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::review::ReviewId;

/// Identity of a movie: title plus release year.
///
/// Ordered by title, then year. This is a total order, so a collection of
/// keys sorts into the alphabetical sequence the browsing queries rely on.
///
/// # Examples
///
/// ```
/// use marquee::MovieKey;
///
/// let alien = MovieKey::new("Alien", 1979);
/// let zodiac = MovieKey::new("Zodiac", 2007);
/// assert!(alien < zodiac);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovieKey {
    /// Movie title, as it appears in the catalogue.
    pub title: String,
    /// Release year.
    pub year: u16,
}

impl MovieKey {
    /// Creates a key from a title and release year.
    #[must_use]
    pub fn new(title: impl Into<String>, year: u16) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }

    /// Returns the first character of the title, if any.
    ///
    /// This is the character letter-bucketed browsing groups by. No case
    /// folding is applied; titles are grouped by their exact first char.
    #[must_use]
    pub fn first_letter(&self) -> Option<char> {
        self.title.chars().next()
    }
}

impl fmt::Display for MovieKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// A catalogue movie.
///
/// Cross-references are foreign-key style: the director, actors, and genres
/// are stored as names, and reviews as [`ReviewId`]s, rather than as owned
/// object graphs. The repository registries hold the referenced entities.
///
/// Equality and ordering follow the identity [`MovieKey`] only; attribute
/// differences never distinguish two movies with the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Identity key (title, year).
    pub key: MovieKey,
    /// Plot description.
    pub description: String,
    /// Runtime in minutes.
    pub runtime_minutes: u32,
    /// Director name, if known (0..1 per movie).
    pub director: Option<String>,
    /// Actor names in attachment order, deduplicated.
    pub actors: Vec<String>,
    /// Genre names in attachment order, deduplicated.
    pub genres: Vec<String>,
    /// Ids of the reviews this movie owns.
    pub reviews: Vec<ReviewId>,
}

impl Movie {
    /// Creates a movie with empty attributes.
    #[must_use]
    pub fn new(title: impl Into<String>, year: u16) -> Self {
        Self {
            key: MovieKey::new(title, year),
            description: String::new(),
            runtime_minutes: 0,
            director: None,
            actors: Vec::new(),
            genres: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Attaches an actor by name. Duplicate names are ignored.
    pub fn add_actor(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.actors.contains(&name) {
            self.actors.push(name);
        }
    }

    /// Attaches a genre by name. Duplicate names are ignored.
    pub fn add_genre(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.genres.contains(&name) {
            self.genres.push(name);
        }
    }

    /// Returns true if the movie is tagged with the given genre name.
    #[must_use]
    pub fn has_genre(&self, name: &str) -> bool {
        self.genres.iter().any(|g| g == name)
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Movie {}

impl PartialOrd for Movie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Movie {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
