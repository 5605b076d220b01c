use std::fmt;
use crate::geometry::AABB;

/// Stable identity of a registry object.
///
/// This is the object's index in the registry at the time of the last
/// rebuild. Ids are only meaningful against the registry they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Registry index of this object
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered collection of bounding volumes the octree is built from.
///
/// Implementations must keep indices stable between two rebuilds: the
/// object at index `i` is the object the tree knows as `ObjectId(i)`.
pub trait ObjectRegistry {
    /// Number of objects in the registry
    fn object_count(&self) -> usize;

    /// World-space bounds of the object at `index`, `None` if out of range
    fn bounding_volume(&self, index: usize) -> Option<AABB>;
}

impl ObjectRegistry for [AABB] {
    fn object_count(&self) -> usize {
        self.len()
    }

    fn bounding_volume(&self, index: usize) -> Option<AABB> {
        self.get(index).copied()
    }
}

impl ObjectRegistry for Vec<AABB> {
    fn object_count(&self) -> usize {
        self.len()
    }

    fn bounding_volume(&self, index: usize) -> Option<AABB> {
        self.get(index).copied()
    }
}
