/// Octree tuning parameters.
///
/// The defaults reproduce the classic setup: a node splits when a fourth
/// object arrives, and nodes three levels below the root never split.

use crate::error::{Error, Result};

/// Default soft capacity of a leaf before it tries to subdivide
pub const DEFAULT_CAPACITY: usize = 3;

/// Default deepest subdivision level (root = 0)
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Hard ceiling on `max_depth`. A full tree at depth 10 already has
/// more than a billion nodes.
pub const MAX_SUPPORTED_DEPTH: u32 = 10;

/// Octree configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeConfig {
    /// Objects a leaf holds before it attempts to subdivide
    pub capacity: usize,
    /// Deepest level allowed to exist; nodes at this depth never subdivide
    pub max_depth: u32,
}

impl OctreeConfig {
    /// Set the leaf capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the maximum subdivision depth
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Check that the configuration can build a tree
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `capacity` is zero or
    /// `max_depth` exceeds [`MAX_SUPPORTED_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(Error::InvalidConfig(format!(
                "max_depth {} exceeds the supported maximum of {}",
                self.max_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        Ok(())
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
