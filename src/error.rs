//! Error types for the tree cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for tree cache mutations.
///
/// Every variant is returned before any state is touched, so the cache is
/// unchanged whenever an operation fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// A root node is already set
    #[error("root node already exists")]
    RootAlreadyExists,

    /// The referenced parent key is not in the cache
    #[error("parent node does not exist")]
    ParentNotFound,

    /// A node with this key is already in the cache
    #[error("node already exists")]
    AlreadyExists,

    /// Reparenting would make a node its own ancestor
    #[error("cycle detected")]
    CycleDetected,
}

// == Result Type Alias ==
/// Convenience Result type for the tree cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::RootAlreadyExists.to_string(),
            "root node already exists"
        );
        assert_eq!(
            CacheError::ParentNotFound.to_string(),
            "parent node does not exist"
        );
        assert_eq!(CacheError::AlreadyExists.to_string(), "node already exists");
        assert_eq!(CacheError::CycleDetected.to_string(), "cycle detected");
    }
}
