/// Collision query strategies.
///
/// A CollisionQuery answers "does this object overlap any other object?".
/// The host picks a strategy per frame: the octree, or the brute-force
/// sweep over every registry object.

use crate::error::{Error, Result};
use crate::geometry::AABB;
use crate::registry::{ObjectId, ObjectRegistry};
use super::octree::Octree;

/// Strategy for per-object overlap tests.
pub trait CollisionQuery {
    /// Whether `id` overlaps any other known object.
    fn is_colliding(&self, id: ObjectId) -> bool;

    /// Ids among `0..count` that overlap something, in ascending order.
    fn colliding_objects(&self, count: usize) -> Vec<ObjectId> {
        (0..count)
            .map(ObjectId)
            .filter(|&id| self.is_colliding(id))
            .collect()
    }
}

impl CollisionQuery for Octree {
    fn is_colliding(&self, id: ObjectId) -> bool {
        Octree::is_colliding(self, id)
    }
}

/// Brute-force collider: tests an object against every other object.
///
/// O(n) per query, O(n²) per frame. Works from a snapshot of the registry
/// taken at construction or at the last `rebuild`.
pub struct BruteForceCollider {
    volumes: Vec<AABB>,
}

impl BruteForceCollider {
    /// Snapshot every volume of `registry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidVolume` if the registry reports an index it
    /// cannot resolve.
    pub fn new<R: ObjectRegistry + ?Sized>(registry: &R) -> Result<Self> {
        let mut collider = Self { volumes: Vec::new() };
        collider.rebuild(registry)?;
        Ok(collider)
    }

    /// Refresh the snapshot from `registry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidVolume` on a missing index; the previous
    /// snapshot is kept in that case.
    pub fn rebuild<R: ObjectRegistry + ?Sized>(&mut self, registry: &R) -> Result<()> {
        let volumes = (0..registry.object_count())
            .map(|index| {
                registry.bounding_volume(index).ok_or_else(|| {
                    Error::InvalidVolume(format!("index {} is missing from the registry", index))
                })
            })
            .collect::<Result<Vec<AABB>>>()?;
        self.volumes = volumes;
        Ok(())
    }

    /// Number of objects in the snapshot
    pub fn object_count(&self) -> usize {
        self.volumes.len()
    }
}

impl CollisionQuery for BruteForceCollider {
    fn is_colliding(&self, id: ObjectId) -> bool {
        let Some(aabb) = self.volumes.get(id.index()) else {
            return false;
        };
        self.volumes
            .iter()
            .enumerate()
            .any(|(index, other)| index != id.index() && other.intersects(aabb))
    }
}

#[cfg(test)]
#[path = "collision_tests.rs"]
mod tests;
