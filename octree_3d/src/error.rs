//! Error types for the Octree3D crate
//!
//! Covers configuration problems, broken registry contents and violations
//! of the octree's placement contract.

use std::fmt;

/// Result type for Octree3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Octree3D errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The octree configuration is unusable (zero capacity, excessive depth)
    InvalidConfig(String),

    /// An object was handed to `add_object` outside of the root bounds
    ObjectOutsideBounds(String),

    /// The registry returned a volume that is missing, inverted or non-finite
    InvalidVolume(String),

    /// No child accepted an object that intersects its parent.
    ///
    /// The root-bounds precondition was broken somewhere upstream.
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::ObjectOutsideBounds(msg) => write!(f, "Object outside bounds: {}", msg),
            Error::InvalidVolume(msg) => write!(f, "Invalid volume: {}", msg),
            Error::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
