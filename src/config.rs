//! Configuration Module
//!
//! Handles loading tree cache configuration from environment variables.

use std::env;

/// Default maximum number of live entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Tree cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold (0 disables eviction)
    pub capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_TREE_CAPACITY` - Maximum cache entries (default: 1000, 0 = unbounded)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("LRU_TREE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }

    /// Returns true if eviction is disabled.
    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both env-driven cases live in one test so they never race each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("LRU_TREE_CAPACITY");
        assert_eq!(Config::from_env().capacity, DEFAULT_CAPACITY);

        env::set_var("LRU_TREE_CAPACITY", "42");
        assert_eq!(Config::from_env().capacity, 42);

        env::set_var("LRU_TREE_CAPACITY", "not-a-number");
        assert_eq!(Config::from_env().capacity, DEFAULT_CAPACITY);

        env::remove_var("LRU_TREE_CAPACITY");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert!(!config.is_unbounded());
        assert!(Config { capacity: 0 }.is_unbounded());
    }
}
