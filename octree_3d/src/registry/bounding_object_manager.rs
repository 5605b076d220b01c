/// Named bounding-object registry.
///
/// Host-side store of the scene's collision volumes: each object has a
/// unique name (e.g. `"Cube_12"`) and a world-space AABB. Objects are kept
/// in insertion order, which is also the order the octree inserts them in.

use rustc_hash::FxHashMap;
use crate::geometry::AABB;
use super::object_registry::{ObjectId, ObjectRegistry};

/// A single named bounding volume
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingObject {
    /// Unique name within the manager
    pub name: String,
    /// World-space bounds
    pub aabb: AABB,
}

/// Insertion-ordered registry of named bounding volumes
#[derive(Debug, Default)]
pub struct BoundingObjectManager {
    objects: Vec<BoundingObject>,
    by_name: FxHashMap<String, ObjectId>,
}

impl BoundingObjectManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object, or replace the bounds of an existing one.
    ///
    /// Returns the object's id. Re-adding a known name keeps its id.
    pub fn add_object(&mut self, name: &str, aabb: AABB) -> ObjectId {
        if let Some(&id) = self.by_name.get(name) {
            self.objects[id.index()].aabb = aabb;
            return id;
        }

        let id = ObjectId(self.objects.len());
        self.objects.push(BoundingObject { name: name.to_string(), aabb });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up an object id by name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// Get an object by id
    pub fn object(&self, id: ObjectId) -> Option<&BoundingObject> {
        self.objects.get(id.index())
    }

    /// Move an object. The octree must be rebuilt to see the change.
    ///
    /// Returns `false` if the id is unknown.
    pub fn set_bounds(&mut self, id: ObjectId, aabb: AABB) -> bool {
        match self.objects.get_mut(id.index()) {
            Some(object) => {
                object.aabb = aabb;
                true
            }
            None => false,
        }
    }

    /// Iterate over `(id, object)` in registry order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &BoundingObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectRegistry for BoundingObjectManager {
    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn bounding_volume(&self, index: usize) -> Option<AABB> {
        self.objects.get(index).map(|o| o.aabb)
    }
}

#[cfg(test)]
#[path = "bounding_object_manager_tests.rs"]
mod tests;
