//! Genre entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A genre tag, identified by name.
///
/// Like actors and directors, genres carry name identity and are
/// deduplicated by the repository registry on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genre(String);

impl Genre {
    /// Creates a genre from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the genre name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Genre {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
