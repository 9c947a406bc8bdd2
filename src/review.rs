//! Review entity and its identifier.
//!
//! A review belongs to exactly one movie and one user, referenced by
//! foreign key (movie key, username) rather than by object pointer. Before
//! the repository accepts a review, its id must already sit in both owners'
//! review lists; the repository's `make_review` factory wires that linkage.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::movie::MovieKey;

/// Globally unique review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Creates a new random review id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a review id from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ReviewId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A user's review of a movie.
///
/// Constructing a `Review` does not register it anywhere; the back-reference
/// invariant is enforced at repository insertion time, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique id, also the value stored in the owners' review lists.
    pub id: ReviewId,
    /// Identity of the reviewed movie.
    pub movie: MovieKey,
    /// Username of the author.
    pub username: String,
    /// Review text.
    pub text: String,
    /// Rating given by the author.
    pub rating: u8,
    /// When the review was written.
    pub timestamp: DateTime<Utc>,
}

impl Review {
    /// Creates a review with a fresh id, timestamped now.
    #[must_use]
    pub fn new(
        movie: MovieKey,
        username: impl Into<String>,
        text: impl Into<String>,
        rating: u8,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            movie,
            username: username.into(),
            text: text.into(),
            rating,
            timestamp: Utc::now(),
        }
    }
}

impl PartialEq for Review {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Review {}
