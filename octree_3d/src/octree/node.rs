/// A single node of the octree arena.
///
/// Nodes live in a flat `Vec` owned by [`Octree`](super::Octree). A node's
/// eight children are allocated contiguously when it subdivides, so the
/// parent only records the index of the first one.

use std::ops::Range;
use glam::Vec3;
use crate::geometry::AABB;
use crate::registry::ObjectId;

/// Index of the root node in the flat node array.
pub(crate) const ROOT: usize = 0;

/// Number of children of a subdivided node.
pub(crate) const CHILD_COUNT: usize = 8;

pub(crate) struct OctreeNode {
    /// Region covered by this node (not the bounds of any stored object)
    pub(crate) bounds: AABB,
    /// Subdivision depth (root = 0)
    pub(crate) depth: u32,
    /// Index of the first of the 8 children (None = leaf)
    pub(crate) first_child: Option<usize>,
    /// Objects held directly by this node, in insertion order
    pub(crate) objects: Vec<ObjectId>,
    /// Union of the bounds of every object stored in this subtree.
    ///
    /// Objects go to the first child they touch and may stick out of it,
    /// so queries prune on this box rather than on `bounds`.
    pub(crate) content: Option<AABB>,
}

impl OctreeNode {
    pub(crate) fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            first_child: None,
            objects: Vec::new(),
            content: None,
        }
    }

    pub(crate) fn is_subdivided(&self) -> bool {
        self.first_child.is_some()
    }

    /// Arena indices of the children, empty for a leaf.
    pub(crate) fn children(&self) -> Range<usize> {
        match self.first_child {
            Some(first) => first..first + CHILD_COUNT,
            None => 0..0,
        }
    }

    /// Forget the stored objects. Structure is left untouched.
    pub(crate) fn clear(&mut self) {
        self.objects.clear();
        self.content = None;
    }

    pub(crate) fn grow_content(&mut self, aabb: &AABB) {
        self.content = Some(match self.content {
            Some(content) => content.union(aabb),
            None => *aabb,
        });
    }
}

/// Compute the region of child `octant` (0–7) of `parent`.
///
/// Bit layout: bit2 = X, bit1 = Y, bit0 = Z (0 = low half, 1 = high half),
/// so octant 0 is (-,-,-), octant 1 is (-,-,+) and octant 7 is (+,+,+).
/// Corners are taken from the parent's min, center and max directly so
/// that siblings share their boundary planes exactly.
pub(crate) fn octant_bounds(parent: &AABB, octant: usize) -> AABB {
    let center = parent.center();
    let pick = |bit: usize, min: f32, mid: f32, max: f32| {
        if octant & bit == 0 { (min, mid) } else { (mid, max) }
    };

    let (min_x, max_x) = pick(4, parent.min.x, center.x, parent.max.x);
    let (min_y, max_y) = pick(2, parent.min.y, center.y, parent.max.y);
    let (min_z, max_z) = pick(1, parent.min.z, center.z, parent.max.z);

    AABB {
        min: Vec3::new(min_x, min_y, min_z),
        max: Vec3::new(max_x, max_y, max_z),
    }
}
