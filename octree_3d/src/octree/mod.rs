//! Octree spatial index and collision queries
//!
//! [`Octree`] is the root handle hosts interact with. [`BruteForceCollider`]
//! answers the same question in O(n) per object and serves as the baseline
//! the octree is measured (and tested) against.

mod node;
mod octree;
mod collision;

pub use octree::Octree;
pub use collision::{CollisionQuery, BruteForceCollider};
