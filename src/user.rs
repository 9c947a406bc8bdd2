//! User entity.

use serde::{Deserialize, Serialize};

use crate::review::ReviewId;

/// A registered user, identified by username.
///
/// The user owns the list of ids of reviews they have written. The password
/// is stored as given; credential handling (hashing, sessions) belongs to an
/// authentication layer outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique username.
    pub username: String,
    /// Stored credential, opaque to this crate.
    pub password: String,
    /// Ids of the reviews this user owns.
    pub reviews: Vec<ReviewId>,
}

impl User {
    /// Creates a user with no reviews.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            reviews: Vec::new(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl Eq for User {}
