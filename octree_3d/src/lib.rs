/*!
# Octree3D

Capacity-driven octree for broad-phase overlap queries between
axis-aligned bounding boxes.

A host keeps its collision volumes in an object registry, builds an
[`Octree`](octree3d::Octree) over it once per scene load (or whenever the
registry changes), and then asks per object whether it collides with
anything else. Queries descend only into the parts of the tree that can
hold an overlapping box, instead of comparing every pair.

## Architecture

- **AABB**: closed-interval axis-aligned box
- **ObjectRegistry**: host-owned, ordered source of bounding volumes
- **Octree**: root handle (rebuild, add_object, clear, draw, object_count, is_colliding)
- **CollisionQuery**: per-object overlap strategy (octree or brute force)
- **RenderQueue**: sink for debug wireframe boxes
- **Diagnostics**: pluggable logger used by the whole crate
*/

// Internal modules
mod error;
mod config;
mod diagnostics;
pub mod log;
pub mod geometry;
pub mod registry;
pub mod render;
pub mod octree;

// Main octree3d namespace module
pub mod octree3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{OctreeConfig, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};

    // Global logger access
    pub use crate::diagnostics::{Diagnostics, DEFAULT_MIN_SEVERITY};

    // Core types
    pub use crate::geometry::AABB;
    pub use crate::registry::{ObjectId, ObjectRegistry, BoundingObject, BoundingObjectManager};
    pub use crate::octree::{Octree, CollisionQuery, BruteForceCollider};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Debug render sub-module
    pub mod render {
        pub use crate::render::*;
    }
}

// Re-export math library at crate root
pub use glam;
