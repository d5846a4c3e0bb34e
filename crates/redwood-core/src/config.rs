//! Tree configuration

use crate::limits::{self, ConfigError, MAX_NODE_SLOTS};

/// Tree configuration builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Arena slots reserved when the tree is created
    pub initial_capacity: usize,

    /// Upper bound on live arena slots, sentinels included
    pub max_nodes: usize,

    /// Validate the whole tree after every mutation
    pub check_invariants: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_nodes: MAX_NODE_SLOTS,
            check_invariants: false,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `keys` keys up front
    pub fn with_key_capacity(mut self, keys: usize) -> Self {
        self.initial_capacity = limits::slots_for_keys(keys);
        self
    }

    /// Reserve a raw number of arena slots up front
    pub fn with_initial_capacity(mut self, slots: usize) -> Self {
        self.initial_capacity = slots;
        self
    }

    /// Cap the number of live arena slots
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Cap the tree at `keys` keys
    pub fn with_max_keys(mut self, keys: usize) -> Self {
        self.max_nodes = limits::slots_for_keys(keys);
        self
    }

    /// Run a full invariant check after every insert and delete
    pub fn check_invariants(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        limits::validate_node_limit(self.max_nodes)?;
        limits::validate_initial_capacity(self.initial_capacity, self.max_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TreeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_nodes, MAX_NODE_SLOTS);
        assert!(!config.check_invariants);
    }

    #[test]
    fn test_builder() {
        let config = TreeConfig::new()
            .with_key_capacity(10)
            .with_max_keys(100)
            .check_invariants(true);

        assert_eq!(config.initial_capacity, 21);
        assert_eq!(config.max_nodes, 201);
        assert!(config.check_invariants);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(TreeConfig::new().with_max_nodes(0).validate().is_err());
        assert!(TreeConfig::new()
            .with_initial_capacity(10)
            .with_max_nodes(5)
            .validate()
            .is_err());
    }
}
