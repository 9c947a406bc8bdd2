//! Repository layer: the abstract catalogue contract and its backends.

pub mod memory;
pub mod traits;

pub use memory::MemoryRepository;
pub use traits::{MovieRepository, RepositoryError};
