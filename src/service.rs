//! Service layer: flat presentation records over the repository.
//!
//! The service assigns the external movie ids the presentation layer works
//! with (1-based, catalogue order) and flattens movies into plain records.
//! Ids are not a repository concept; they are fixed when the service is
//! constructed, which is sound because the movie set is populated once at
//! startup and only reviews are added afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::movie::{Movie, MovieKey};
use crate::repository::traits::{MovieRepository, RepositoryError};
use crate::review::Review;

/// External movie identifier, assigned by the service (1-based).
pub type MovieId = usize;

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No movie has the given id.
    #[error("no movie with id {0}")]
    NonExistentMovie(MovieId),

    /// No user has the given username.
    #[error("unknown user '{0}'")]
    UnknownUser(String),

    /// The repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Genre as exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreRecord {
    /// Genre name.
    pub genre: String,
}

/// Review as exposed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecord {
    /// Review text.
    pub review_text: String,
    /// Rating given by the author.
    pub rating: u8,
    /// Author username.
    pub username: String,
    /// When the review was written.
    pub timestamp: DateTime<Utc>,
}

impl From<Review> for ReviewRecord {
    fn from(review: Review) -> Self {
        Self {
            review_text: review.text,
            rating: review.rating,
            username: review.username,
            timestamp: review.timestamp,
        }
    }
}

/// Movie as exposed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct MovieRecord {
    /// External id.
    pub id: MovieId,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: u16,
    /// Plot description.
    pub description: String,
    /// Director name, if known.
    pub director: Option<String>,
    /// Actor names in catalogue order.
    pub actors: Vec<String>,
    /// Genres in catalogue order.
    pub genres: Vec<GenreRecord>,
    /// Runtime in minutes.
    pub runtime: u32,
    /// Reviews of this movie.
    pub reviews: Vec<ReviewRecord>,
}

/// One letter bucket plus its non-empty neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct LetterPage {
    /// Movies whose title starts with the queried letter.
    pub movies: Vec<MovieRecord>,
    /// Closest non-empty letter before the queried one.
    pub previous: Option<char>,
    /// Closest non-empty letter after the queried one.
    pub next: Option<char>,
}

/// Presentation-facing facade over a [`MovieRepository`].
pub struct CatalogueService {
    repo: Arc<dyn MovieRepository>,
    keys: Vec<MovieKey>,
    ids: HashMap<MovieKey, MovieId>,
}

impl CatalogueService {
    /// Builds the service and assigns ids over the current catalogue.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn new(repo: Arc<dyn MovieRepository>) -> Result<Self, ServiceError> {
        let mut keys = Vec::with_capacity(repo.get_number_of_movies()?);
        for letter in repo.get_letters()? {
            for movie in repo.get_movies_by_letter(letter)? {
                keys.push(movie.key);
            }
        }
        let ids = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key.clone(), index + 1))
            .collect();
        Ok(Self { repo, keys, ids })
    }

    fn key_for(&self, id: MovieId) -> Result<&MovieKey, ServiceError> {
        id.checked_sub(1)
            .and_then(|index| self.keys.get(index))
            .ok_or(ServiceError::NonExistentMovie(id))
    }

    fn record(&self, movie: Movie) -> Result<Option<MovieRecord>, ServiceError> {
        // Movies inserted after construction have no id and cannot be
        // presented; the catalogue lifecycle makes that a non-case.
        let Some(&id) = self.ids.get(&movie.key) else {
            return Ok(None);
        };
        let reviews = self
            .repo
            .get_reviews()?
            .into_iter()
            .filter(|r| movie.reviews.contains(&r.id))
            .map(ReviewRecord::from)
            .collect();
        Ok(Some(MovieRecord {
            id,
            title: movie.key.title,
            year: movie.key.year,
            description: movie.description,
            director: movie.director,
            actors: movie.actors,
            genres: movie
                .genres
                .into_iter()
                .map(|genre| GenreRecord { genre })
                .collect(),
            runtime: movie.runtime_minutes,
            reviews,
        }))
    }

    fn records(&self, movies: Vec<Movie>) -> Result<Vec<MovieRecord>, ServiceError> {
        let mut out = Vec::with_capacity(movies.len());
        for movie in movies {
            if let Some(record) = self.record(movie)? {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Returns the movie with the given id.
    ///
    /// # Errors
    /// `NonExistentMovie` if the id is unknown.
    pub fn get_movie(&self, id: MovieId) -> Result<MovieRecord, ServiceError> {
        let key = self.key_for(id)?;
        let movie = self
            .repo
            .get_movie(&key.title, key.year)?
            .ok_or(ServiceError::NonExistentMovie(id))?;
        self.record(movie)?
            .ok_or(ServiceError::NonExistentMovie(id))
    }

    /// Returns the alphabetically first movie, or `None` when the catalogue
    /// is empty.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_first_movie(&self) -> Result<Option<MovieRecord>, ServiceError> {
        if self.keys.is_empty() {
            return Ok(None);
        }
        self.get_movie(1).map(Some)
    }

    /// Returns the alphabetically last movie, or `None` when the catalogue
    /// is empty.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_last_movie(&self) -> Result<Option<MovieRecord>, ServiceError> {
        if self.keys.is_empty() {
            return Ok(None);
        }
        self.get_movie(self.keys.len()).map(Some)
    }

    /// Returns the number of movies with assigned ids.
    #[must_use]
    pub fn get_number_of_movies(&self) -> usize {
        self.keys.len()
    }

    /// Returns the distinct title first-letters present, in order.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_all_letters(&self) -> Result<Vec<char>, ServiceError> {
        Ok(self.repo.get_letters()?)
    }

    /// Returns the letter bucket for `letter` plus its non-empty
    /// neighbouring letters.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_movies_by_letter(&self, letter: char) -> Result<LetterPage, ServiceError> {
        let movies = self.records(self.repo.get_movies_by_letter(letter)?)?;
        let letters = self.repo.get_letters()?;
        let previous = letters.iter().rev().find(|&&c| c < letter).copied();
        let next = letters.iter().find(|&&c| c > letter).copied();
        Ok(LetterPage {
            movies,
            previous,
            next,
        })
    }

    /// Returns the movies tagged with the genre name, in catalogue order.
    /// Empty for a genre no movie has.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_movies_from_genre(&self, genre: &str) -> Result<Vec<MovieRecord>, ServiceError> {
        self.records(self.repo.get_movies_from_genre(genre)?)
    }

    /// Returns the movies released in `year`, in catalogue order.
    ///
    /// # Errors
    /// Returns [`ServiceError::Repository`] if the repository fails.
    pub fn get_movies_from_year(&self, year: u16) -> Result<Vec<MovieRecord>, ServiceError> {
        self.records(self.repo.get_movies_from_year(year)?)
    }

    /// Posts a review for the movie with the given id.
    ///
    /// # Errors
    /// - `NonExistentMovie` if the id is unknown
    /// - `UnknownUser` if the username is not registered
    pub fn add_review(
        &self,
        id: MovieId,
        text: &str,
        rating: u8,
        username: &str,
    ) -> Result<(), ServiceError> {
        let key = self.key_for(id)?.clone();
        if self.repo.get_user(username)?.is_none() {
            return Err(ServiceError::UnknownUser(username.to_string()));
        }
        let review = self
            .repo
            .make_review(&key.title, key.year, username, text, rating)?;
        self.repo.add_review(review)?;
        Ok(())
    }

    /// Returns the reviews of the movie with the given id.
    ///
    /// # Errors
    /// `NonExistentMovie` if the id is unknown.
    pub fn get_reviews_for_movie(&self, id: MovieId) -> Result<Vec<ReviewRecord>, ServiceError> {
        Ok(self.get_movie(id)?.reviews)
    }
}
