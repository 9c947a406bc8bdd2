//! In-memory repository backend.
//!
//! This module provides the thread-safe in-memory implementation of
//! [`MovieRepository`]. It is intended for embedded usage, tests, and as a
//! reference implementation.
//!
//! The movie collection lives in a `BTreeMap` keyed by [`MovieKey`], so it
//! is sorted by (title, year) after every insert without re-sorting, and
//! identity lookups are indexed rather than linear scans. Users, registries,
//! and reviews carry hash indices for the same reason. All state sits behind
//! a single `RwLock`: one writer (ingestion, then occasional review
//! additions), many readers.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use crate::genre::Genre;
use crate::movie::{Movie, MovieKey};
use crate::people::{Actor, Director};
use crate::repository::traits::{MovieRepository, RepositoryError};
use crate::review::{Review, ReviewId};
use crate::user::User;

fn lock_err(context: &'static str) -> RepositoryError {
    RepositoryError::BackendError(format!("poisoned lock: {context}"))
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for Actor {
    fn name(&self) -> &str {
        Actor::name(self)
    }
}

impl Named for Director {
    fn name(&self) -> &str {
        Director::name(self)
    }
}

impl Named for Genre {
    fn name(&self) -> &str {
        Genre::name(self)
    }
}

/// Dedupe-on-add registry: first-seen listing order plus a name index.
#[derive(Debug)]
struct Registry<T> {
    ordered: Vec<T>,
    index: HashSet<String>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            ordered: Vec::new(),
            index: HashSet::new(),
        }
    }
}

impl<T: Named + Clone> Registry<T> {
    fn add(&mut self, item: T) {
        if self.index.insert(item.name().to_string()) {
            self.ordered.push(item);
        }
    }

    fn all(&self) -> Vec<T> {
        self.ordered.clone()
    }
}

#[derive(Debug, Default)]
struct CatalogueState {
    movies: BTreeMap<MovieKey, Movie>,
    users: HashMap<String, User>,
    actors: Registry<Actor>,
    directors: Registry<Director>,
    genres: Registry<Genre>,
    reviews: Vec<Review>,
    review_ids: HashSet<ReviewId>,
}

/// Thread-safe in-memory [`MovieRepository`] backend.
///
/// # Examples
///
/// ```
/// use marquee::{MemoryRepository, Movie, MovieRepository};
///
/// let repo = MemoryRepository::new();
/// repo.add_movie(Movie::new("Alien", 1979)).unwrap();
/// assert_eq!(repo.get_number_of_movies().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<CatalogueState>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovieRepository for MemoryRepository {
    fn add_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_user"))?;
        state.users.entry(user.username.clone()).or_insert(user);
        Ok(())
    }

    fn get_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_user"))?;
        Ok(state.users.get(username).cloned())
    }

    fn add_movie(&self, movie: Movie) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_movie"))?;
        state.movies.entry(movie.key.clone()).or_insert(movie);
        Ok(())
    }

    fn get_movie(&self, title: &str, year: u16) -> Result<Option<Movie>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_movie"))?;
        let key = MovieKey::new(title, year);
        Ok(state.movies.get(&key).cloned())
    }

    fn get_movies_by_letter(&self, letter: char) -> Result<Vec<Movie>, RepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("get_movies_by_letter"))?;
        let mut run = Vec::new();
        for movie in state.movies.values() {
            if movie.key.first_letter() == Some(letter) {
                run.push(movie.clone());
            } else if !run.is_empty() {
                // Sorted collection: the run is contiguous, stop at the
                // first title past it.
                break;
            }
        }
        Ok(run)
    }

    fn get_letters(&self) -> Result<Vec<char>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_letters"))?;
        let mut letters: Vec<char> = Vec::new();
        for key in state.movies.keys() {
            if let Some(c) = key.first_letter() {
                // Keys are sorted, so first letters arrive in non-decreasing
                // order and a last-element check is enough to dedupe.
                if letters.last() != Some(&c) {
                    letters.push(c);
                }
            }
        }
        Ok(letters)
    }

    fn get_number_of_movies(&self) -> Result<usize, RepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("get_number_of_movies"))?;
        Ok(state.movies.len())
    }

    fn get_first_movie(&self) -> Result<Option<Movie>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_first_movie"))?;
        Ok(state.movies.values().next().cloned())
    }

    fn get_last_movie(&self) -> Result<Option<Movie>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_last_movie"))?;
        Ok(state.movies.values().next_back().cloned())
    }

    fn get_movies_from_year(&self, year: u16) -> Result<Vec<Movie>, RepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("get_movies_from_year"))?;
        Ok(state
            .movies
            .values()
            .filter(|m| m.key.year == year)
            .cloned()
            .collect())
    }

    fn get_movies_from_genre(&self, genre: &str) -> Result<Vec<Movie>, RepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("get_movies_from_genre"))?;
        Ok(state
            .movies
            .values()
            .filter(|m| m.has_genre(genre))
            .cloned()
            .collect())
    }

    fn add_genre(&self, genre: Genre) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_genre"))?;
        state.genres.add(genre);
        Ok(())
    }

    fn get_genres(&self) -> Result<Vec<Genre>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_genres"))?;
        Ok(state.genres.all())
    }

    fn add_actor(&self, actor: Actor) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_actor"))?;
        state.actors.add(actor);
        Ok(())
    }

    fn get_actors(&self) -> Result<Vec<Actor>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_actors"))?;
        Ok(state.actors.all())
    }

    fn add_director(&self, director: Director) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_director"))?;
        state.directors.add(director);
        Ok(())
    }

    fn get_directors(&self) -> Result<Vec<Director>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_directors"))?;
        Ok(state.directors.all())
    }

    fn make_review(
        &self,
        title: &str,
        year: u16,
        username: &str,
        text: &str,
        rating: u8,
    ) -> Result<Review, RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("make_review"))?;
        let key = MovieKey::new(title, year);

        // Check both targets before touching either, so a missing user
        // leaves the movie untouched.
        if !state.movies.contains_key(&key) {
            return Err(RepositoryError::MovieNotFound(key));
        }
        if !state.users.contains_key(username) {
            return Err(RepositoryError::UserNotFound(username.to_string()));
        }

        let review = Review::new(key.clone(), username, text, rating);
        if let Some(movie) = state.movies.get_mut(&key) {
            movie.reviews.push(review.id);
        }
        if let Some(user) = state.users.get_mut(username) {
            user.reviews.push(review.id);
        }
        Ok(review)
    }

    fn add_review(&self, review: Review) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| lock_err("add_review"))?;

        let movie_linked = state
            .movies
            .get(&review.movie)
            .is_some_and(|m| m.reviews.contains(&review.id));
        if !movie_linked {
            return Err(RepositoryError::ReviewNotLinkedToMovie {
                id: review.id,
                movie: review.movie,
            });
        }

        let user_linked = state
            .users
            .get(&review.username)
            .is_some_and(|u| u.reviews.contains(&review.id));
        if !user_linked {
            return Err(RepositoryError::ReviewNotLinkedToUser {
                id: review.id,
                username: review.username,
            });
        }

        if state.review_ids.insert(review.id) {
            state.reviews.push(review);
        }
        Ok(())
    }

    fn get_reviews(&self) -> Result<Vec<Review>, RepositoryError> {
        let state = self.state.read().map_err(|_| lock_err("get_reviews"))?;
        Ok(state.reviews.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with_genre(title: &str, year: u16, genre: &str) -> Movie {
        let mut movie = Movie::new(title, year);
        movie.add_genre(genre);
        movie
    }

    fn seeded_repo() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.add_movie(movie_with_genre("Suicide Squad", 2016, "Action"))
            .unwrap();
        repo.add_movie(movie_with_genre("Guardians of the Galaxy", 2014, "Action"))
            .unwrap();
        repo.add_movie(movie_with_genre("Prometheus", 2012, "Adventure"))
            .unwrap();
        repo.add_movie(movie_with_genre("Sing", 2016, "Comedy"))
            .unwrap();
        repo.add_movie(movie_with_genre("Split", 2016, "Horror"))
            .unwrap();
        repo
    }

    #[test]
    fn test_movies_stay_sorted_regardless_of_insert_order() {
        let repo = seeded_repo();
        let letters = repo.get_letters().unwrap();
        assert_eq!(letters, vec!['G', 'P', 'S']);
        assert_eq!(
            repo.get_first_movie().unwrap().unwrap().key.title,
            "Guardians of the Galaxy"
        );
        assert_eq!(
            repo.get_last_movie().unwrap().unwrap().key.title,
            "Suicide Squad"
        );
    }

    #[test]
    fn test_add_movie_dedupes_by_identity() {
        let repo = MemoryRepository::new();
        let mut first = Movie::new("Sing", 2016);
        first.runtime_minutes = 108;
        repo.add_movie(first).unwrap();
        repo.add_movie(Movie::new("Sing", 2016)).unwrap();

        assert_eq!(repo.get_number_of_movies().unwrap(), 1);
        // First insert wins; the duplicate is silently ignored.
        let stored = repo.get_movie("Sing", 2016).unwrap().unwrap();
        assert_eq!(stored.runtime_minutes, 108);
    }

    #[test]
    fn test_same_title_different_year_are_distinct() {
        let repo = MemoryRepository::new();
        repo.add_movie(Movie::new("Alien", 1979)).unwrap();
        repo.add_movie(Movie::new("Alien", 1986)).unwrap();
        assert_eq!(repo.get_number_of_movies().unwrap(), 2);
    }

    #[test]
    fn test_first_and_last_on_empty_repo() {
        let repo = MemoryRepository::new();
        assert!(repo.get_first_movie().unwrap().is_none());
        assert!(repo.get_last_movie().unwrap().is_none());
        assert_eq!(repo.get_number_of_movies().unwrap(), 0);
    }

    #[test]
    fn test_first_and_last_after_inserts() {
        let repo = MemoryRepository::new();
        repo.add_movie(Movie::new("Zodiac", 2007)).unwrap();
        repo.add_movie(Movie::new("Alien", 1979)).unwrap();
        assert_eq!(repo.get_first_movie().unwrap().unwrap().key.title, "Alien");
        assert_eq!(repo.get_last_movie().unwrap().unwrap().key.title, "Zodiac");
    }

    #[test]
    fn test_movies_by_letter_returns_contiguous_run() {
        let repo = seeded_repo();
        let p_movies = repo.get_movies_by_letter('P').unwrap();
        assert_eq!(p_movies.len(), 1);
        assert_eq!(p_movies[0].key.title, "Prometheus");

        let s_movies = repo.get_movies_by_letter('S').unwrap();
        let titles: Vec<&str> = s_movies.iter().map(|m| m.key.title.as_str()).collect();
        assert_eq!(titles, vec!["Sing", "Split", "Suicide Squad"]);
    }

    #[test]
    fn test_movies_by_letter_with_no_match() {
        let repo = seeded_repo();
        assert!(repo.get_movies_by_letter('Z').unwrap().is_empty());
    }

    #[test]
    fn test_letter_comparison_is_case_exact() {
        let repo = seeded_repo();
        assert!(repo.get_movies_by_letter('p').unwrap().is_empty());
    }

    #[test]
    fn test_movies_from_year() {
        let repo = seeded_repo();
        let from_2016 = repo.get_movies_from_year(2016).unwrap();
        assert_eq!(from_2016.len(), 3);
        assert!(repo.get_movies_from_year(1999).unwrap().is_empty());
    }

    #[test]
    fn test_movies_from_genre_in_catalogue_order() {
        let repo = seeded_repo();
        let action = repo.get_movies_from_genre("Action").unwrap();
        let titles: Vec<&str> = action.iter().map(|m| m.key.title.as_str()).collect();
        assert_eq!(titles, vec!["Guardians of the Galaxy", "Suicide Squad"]);
        assert!(repo.get_movies_from_genre("Documentary").unwrap().is_empty());
    }

    #[test]
    fn test_user_dedupe_and_lookup() {
        let repo = MemoryRepository::new();
        repo.add_user(User::new("shaun", "12345")).unwrap();
        repo.add_user(User::new("shaun", "other")).unwrap();

        let user = repo.get_user("shaun").unwrap().unwrap();
        assert_eq!(user.password, "12345");
        assert!(repo.get_user("dave").unwrap().is_none());
    }

    #[test]
    fn test_registries_dedupe_by_name() {
        let repo = MemoryRepository::new();
        repo.add_actor(Actor::new("Noomi Rapace")).unwrap();
        repo.add_actor(Actor::new("Noomi Rapace")).unwrap();
        repo.add_director(Director::new("Ridley Scott")).unwrap();
        repo.add_genre(Genre::new("Sci-Fi")).unwrap();
        repo.add_genre(Genre::new("Sci-Fi")).unwrap();

        assert_eq!(repo.get_actors().unwrap().len(), 1);
        assert_eq!(repo.get_directors().unwrap().len(), 1);
        assert_eq!(repo.get_genres().unwrap().len(), 1);
    }

    #[test]
    fn test_make_review_wires_both_owner_lists() {
        let repo = seeded_repo();
        repo.add_user(User::new("shaun", "12345")).unwrap();

        let review = repo
            .make_review("Prometheus", 2012, "shaun", "Wasn't a fan", 4)
            .unwrap();

        let movie = repo.get_movie("Prometheus", 2012).unwrap().unwrap();
        let user = repo.get_user("shaun").unwrap().unwrap();
        assert!(movie.reviews.contains(&review.id));
        assert!(user.reviews.contains(&review.id));

        repo.add_review(review).unwrap();
        assert_eq!(repo.get_reviews().unwrap().len(), 1);
    }

    #[test]
    fn test_make_review_unknown_movie() {
        let repo = seeded_repo();
        repo.add_user(User::new("shaun", "12345")).unwrap();
        let err = repo
            .make_review("Nonexistent", 2020, "shaun", "?", 1)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::MovieNotFound(_)));
    }

    #[test]
    fn test_make_review_unknown_user_leaves_movie_untouched() {
        let repo = seeded_repo();
        let err = repo
            .make_review("Prometheus", 2012, "dave", "?", 1)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UserNotFound(_)));

        let movie = repo.get_movie("Prometheus", 2012).unwrap().unwrap();
        assert!(movie.reviews.is_empty());
    }

    #[test]
    fn test_add_review_rejects_broken_movie_linkage() {
        let repo = seeded_repo();
        repo.add_user(User::new("shaun", "12345")).unwrap();

        // Built outside the factory: neither owner lists it.
        let review = Review::new(MovieKey::new("Prometheus", 2012), "shaun", "Wow", 10);
        let err = repo.add_review(review).unwrap_err();
        assert!(err.is_linkage_violation());
        assert!(matches!(
            err,
            RepositoryError::ReviewNotLinkedToMovie { .. }
        ));
        assert_eq!(repo.get_reviews().unwrap().len(), 0);
    }

    #[test]
    fn test_add_review_rejects_broken_user_linkage() {
        let repo = seeded_repo();
        repo.add_user(User::new("shaun", "12345")).unwrap();

        let review = repo
            .make_review("Prometheus", 2012, "shaun", "Wow", 10)
            .unwrap();
        // Forge the author: the movie lists the id, the claimed user does not.
        repo.add_user(User::new("dave", "54321")).unwrap();
        let mut forged = review;
        forged.username = "dave".to_string();

        let err = repo.add_review(forged).unwrap_err();
        assert!(matches!(err, RepositoryError::ReviewNotLinkedToUser { .. }));
        assert_eq!(repo.get_reviews().unwrap().len(), 0);
    }

    #[test]
    fn test_add_review_dedupes_by_id() {
        let repo = seeded_repo();
        repo.add_user(User::new("shaun", "12345")).unwrap();
        let review = repo
            .make_review("Sing", 2016, "shaun", "Catchy", 7)
            .unwrap();
        repo.add_review(review.clone()).unwrap();
        repo.add_review(review).unwrap();
        assert_eq!(repo.get_reviews().unwrap().len(), 1);
    }
}
