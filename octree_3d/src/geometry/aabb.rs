use glam::Vec3;

// ===== AABB =====

/// Axis-Aligned Bounding Box
///
/// Used both for the objects indexed by the octree and for the regions
/// of the octree nodes themselves. Intervals are closed: two boxes that
/// only share a face, edge or corner are considered overlapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Degenerate box at the origin (zero size)
    pub const ZERO: AABB = AABB { min: Vec3::ZERO, max: Vec3::ZERO };

    /// Create a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from its center and full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self { min: center - half, max: center + half }
    }

    /// Smallest box enclosing every box of the iterator.
    ///
    /// Returns `None` for an empty iterator.
    pub fn enclosing<I>(boxes: I) -> Option<AABB>
    where
        I: IntoIterator<Item = AABB>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Compute the center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the extents along each axis.
    pub fn half_size(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Test if this AABB fully contains another AABB (boundaries included).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Finite corners with `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::ZERO
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
