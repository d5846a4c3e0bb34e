//! Capacity limits for the node arena

/// Maximum number of arena slots (node handles are 32-bit indices)
pub const MAX_NODE_SLOTS: usize = u32::MAX as usize;

/// Maximum number of keys a single tree can hold
///
/// A tree with `n` keys owns `2n + 1` slots: every key-bearing node plus
/// one sentinel leaf per absent child.
pub const MAX_KEYS: usize = (MAX_NODE_SLOTS - 1) / 2;

/// Slots needed to grow the tree by one key
///
/// The sentinel being replaced turns into the new key-bearing node, so only
/// its two fresh sentinel children need new slots.
pub const SLOTS_PER_INSERT: usize = 2;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroNodeLimit,
    NodeLimitTooLarge { limit: usize, max: usize },
    CapacityAboveLimit { capacity: usize, limit: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroNodeLimit => write!(f, "Node limit must allow at least the root sentinel"),
            Self::NodeLimitTooLarge { limit, max } => {
                write!(f, "Node limit too large: {} (max {})", limit, max)
            }
            Self::CapacityAboveLimit { capacity, limit } => {
                write!(
                    f,
                    "Initial capacity {} exceeds node limit {}",
                    capacity, limit
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate the node limit
pub fn validate_node_limit(limit: usize) -> Result<(), ConfigError> {
    if limit == 0 {
        return Err(ConfigError::ZeroNodeLimit);
    }
    if limit > MAX_NODE_SLOTS {
        return Err(ConfigError::NodeLimitTooLarge {
            limit,
            max: MAX_NODE_SLOTS,
        });
    }
    Ok(())
}

/// Validate an up-front reservation against the node limit
pub fn validate_initial_capacity(capacity: usize, limit: usize) -> Result<(), ConfigError> {
    if capacity > limit {
        return Err(ConfigError::CapacityAboveLimit { capacity, limit });
    }
    Ok(())
}

/// Number of slots a tree holding `keys` keys occupies
pub fn slots_for_keys(keys: usize) -> usize {
    keys.saturating_mul(2).saturating_add(1)
}
