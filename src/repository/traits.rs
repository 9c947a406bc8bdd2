//! Abstract repository trait for the movie catalogue.
//!
//! The trait defines the contract the service layer and the catalogue loader
//! program against. Keeping it abstract allows an in-memory backend for
//! embedded use and tests, and leaves room for persistent backends later.
//!
//! Absence is not an error: lookups return `Ok(None)` and filters return
//! `Ok(vec![])` when nothing matches. Errors are reserved for violated
//! invariants (broken review linkage, missing factory targets) and backend
//! failures.

use thiserror::Error;

use crate::genre::Genre;
use crate::movie::{Movie, MovieKey};
use crate::people::{Actor, Director};
use crate::review::{Review, ReviewId};
use crate::user::User;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The review's id is missing from its movie's review list.
    #[error("review {id} is not linked to movie '{movie}'")]
    ReviewNotLinkedToMovie {
        /// Id of the rejected review.
        id: ReviewId,
        /// Identity of the movie the review claims to belong to.
        movie: MovieKey,
    },

    /// The review's id is missing from its user's review list.
    #[error("review {id} is not linked to user '{username}'")]
    ReviewNotLinkedToUser {
        /// Id of the rejected review.
        id: ReviewId,
        /// Username the review claims as its author.
        username: String,
    },

    /// A review factory target movie does not exist.
    #[error("movie not found: {0}")]
    MovieNotFound(MovieKey),

    /// A review factory target user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Backend error.
    #[error("repository backend error: {0}")]
    BackendError(String),
}

impl RepositoryError {
    /// Returns true for either side of a broken review linkage.
    #[must_use]
    pub fn is_linkage_violation(&self) -> bool {
        matches!(
            self,
            Self::ReviewNotLinkedToMovie { .. } | Self::ReviewNotLinkedToUser { .. }
        )
    }
}

/// Storage contract for the movie catalogue.
///
/// # Ordering Guarantees
/// The movie collection is kept sorted by (title, year) at all times;
/// `get_movies_by_letter`, `get_first_movie`, and `get_last_movie` rely on
/// that order.
pub trait MovieRepository: Send + Sync {
    /// Adds a user. A user with the same username is silently ignored.
    fn add_user(&self, user: User) -> Result<(), RepositoryError>;

    /// Gets a user by username, or `None` if unknown.
    fn get_user(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Adds a movie. A movie with the same (title, year) is silently ignored.
    fn add_movie(&self, movie: Movie) -> Result<(), RepositoryError>;

    /// Gets a movie by exact (title, year), or `None` if unknown.
    fn get_movie(&self, title: &str, year: u16) -> Result<Option<Movie>, RepositoryError>;

    /// Returns the contiguous run of movies whose title starts with `letter`.
    ///
    /// The run is taken from the alphabetically ordered collection and stops
    /// at the first non-matching title after a match. Comparison is against
    /// the exact first character; no case folding.
    fn get_movies_by_letter(&self, letter: char) -> Result<Vec<Movie>, RepositoryError>;

    /// Returns the distinct first letters of titles present, in catalogue
    /// order. Callers derive previous/next non-empty letters from this.
    fn get_letters(&self) -> Result<Vec<char>, RepositoryError>;

    /// Returns the number of movies stored.
    fn get_number_of_movies(&self) -> Result<usize, RepositoryError>;

    /// Returns the alphabetically first movie, or `None` when empty.
    fn get_first_movie(&self) -> Result<Option<Movie>, RepositoryError>;

    /// Returns the alphabetically last movie, or `None` when empty.
    fn get_last_movie(&self) -> Result<Option<Movie>, RepositoryError>;

    /// Returns all movies released in `year`, in catalogue order.
    fn get_movies_from_year(&self, year: u16) -> Result<Vec<Movie>, RepositoryError>;

    /// Returns all movies tagged with the genre name, in catalogue order.
    fn get_movies_from_genre(&self, genre: &str) -> Result<Vec<Movie>, RepositoryError>;

    /// Adds a genre to the registry. Duplicates by name are ignored.
    fn add_genre(&self, genre: Genre) -> Result<(), RepositoryError>;

    /// Returns all registered genres in first-seen order.
    fn get_genres(&self) -> Result<Vec<Genre>, RepositoryError>;

    /// Adds an actor to the registry. Duplicates by name are ignored.
    fn add_actor(&self, actor: Actor) -> Result<(), RepositoryError>;

    /// Returns all registered actors in first-seen order.
    fn get_actors(&self) -> Result<Vec<Actor>, RepositoryError>;

    /// Adds a director to the registry. Duplicates by name are ignored.
    fn add_director(&self, director: Director) -> Result<(), RepositoryError>;

    /// Returns all registered directors in first-seen order.
    fn get_directors(&self) -> Result<Vec<Director>, RepositoryError>;

    /// Builds a review and wires its id into the stored movie's and user's
    /// review lists, making it eligible for [`add_review`].
    ///
    /// Both owner collections are updated atomically; if either target is
    /// missing, nothing is modified.
    ///
    /// # Errors
    /// - `MovieNotFound` if no movie has the given (title, year)
    /// - `UserNotFound` if no user has the given username
    ///
    /// [`add_review`]: MovieRepository::add_review
    fn make_review(
        &self,
        title: &str,
        year: u16,
        username: &str,
        text: &str,
        rating: u8,
    ) -> Result<Review, RepositoryError>;

    /// Accepts a review into the repository after verifying its linkage.
    ///
    /// The review's id must already be present in both its movie's and its
    /// user's review lists; the repository verifies, it never repairs. On a
    /// missing back-reference the repository is left unmodified. A review
    /// already stored under the same id is silently ignored.
    ///
    /// # Errors
    /// - `ReviewNotLinkedToMovie` if the movie is missing or does not list
    ///   the review
    /// - `ReviewNotLinkedToUser` if the user is missing or does not list
    ///   the review
    fn add_review(&self, review: Review) -> Result<(), RepositoryError>;

    /// Returns all stored reviews in insertion order.
    fn get_reviews(&self) -> Result<Vec<Review>, RepositoryError>;
}
