//! Geometry primitives
//!
//! Axis-aligned bounding boxes and the overlap rules the octree relies on.

mod aabb;

pub use aabb::AABB;
