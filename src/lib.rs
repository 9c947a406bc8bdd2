//! # Marquee — an in-memory movie catalogue
//!
//! Marquee ingests a CSV movie dataset, stores the resulting entities in an
//! in-memory repository, and exposes the query operations a presentation
//! layer needs: identity lookups, alphabetical letter-bucketed browsing,
//! year and genre filters, and linkage-checked user reviews.
//!
//! ## Core Concepts
//!
//! - **Movie**: identified by (title, year); the collection is kept sorted
//!   by that key so letter-range queries are contiguous runs
//! - **Registries**: actors, directors, and genres are deduplicated by name
//! - **Review**: belongs to one movie and one user by foreign key; the
//!   repository only accepts a review whose id is already present in both
//!   owners' review lists
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use marquee::{CatalogueService, MemoryRepository, Movie, MovieRepository, User};
//!
//! let repo = Arc::new(MemoryRepository::new());
//! repo.add_movie(Movie::new("Prometheus", 2012)).unwrap();
//! repo.add_user(User::new("shaun", "12345")).unwrap();
//!
//! let service = CatalogueService::new(repo).unwrap();
//! service.add_review(1, "Wasn't a fan", 4, "shaun").unwrap();
//! assert_eq!(service.get_reviews_for_movie(1).unwrap().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod genre;
pub mod loader;
pub mod movie;
pub mod people;
pub mod repository;
pub mod review;
pub mod service;
pub mod user;

// Re-export primary types at crate root for convenience
pub use genre::Genre;
pub use loader::{load_catalogue, load_catalogue_from_reader, LoadError, LoadSummary};
pub use movie::{Movie, MovieKey};
pub use people::{Actor, Director};
pub use repository::{MemoryRepository, MovieRepository, RepositoryError};
pub use review::{Review, ReviewId};
pub use service::{
    CatalogueService, GenreRecord, LetterPage, MovieId, MovieRecord, ReviewRecord, ServiceError,
};
pub use user::User;
