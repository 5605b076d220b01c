/// Octree: capacity-driven spatial index for AABB overlap queries.
///
/// Objects are placed in the first node, in child index order, whose
/// region they touch. A leaf keeps up to `capacity` objects; the next
/// insertion subdivides it into 8 octants and redistributes its objects,
/// unless the leaf is already at `max_depth`, in which case it simply keeps
/// growing.
///
/// The tree is rebuilt from scratch from an [`ObjectRegistry`]; there is no
/// incremental removal. Stored objects are referred to by [`ObjectId`], and
/// a copy of each object's bounds is kept in an identity cache that also
/// records the node currently holding it.

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use crate::config::OctreeConfig;
use crate::error::{Error, Result};
use crate::geometry::AABB;
use crate::registry::{ObjectId, ObjectRegistry};
use crate::render::{DrawMode, RenderQueue};
use super::node::{octant_bounds, OctreeNode, CHILD_COUNT, ROOT};

const SOURCE: &str = "octree3d::Octree";

/// Color of the debug wireframe boxes emitted by `draw`
const WIRE_COLOR: Vec3 = Vec3::ONE;

/// Root handle of an octree.
pub struct Octree {
    /// Flat array of all nodes, root first
    nodes: Vec<OctreeNode>,
    /// Capacity and depth limits
    config: OctreeConfig,
    /// Identity cache: object → (node index, bounds at insertion)
    locations: FxHashMap<ObjectId, (usize, AABB)>,
}

impl Octree {
    /// Build an octree over every object of `registry` with the default config.
    ///
    /// # Errors
    ///
    /// See [`Octree::rebuild`].
    pub fn new<R: ObjectRegistry + ?Sized>(registry: &R) -> Result<Self> {
        Self::with_config(OctreeConfig::default(), registry)
    }

    /// Build an octree over every object of `registry`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` for an unusable config, and any error
    /// of [`Octree::rebuild`].
    pub fn with_config<R: ObjectRegistry + ?Sized>(
        config: OctreeConfig,
        registry: &R,
    ) -> Result<Self> {
        let mut octree = Self::empty(config)?;
        octree.rebuild(registry)?;
        Ok(octree)
    }

    /// Create a tree with a degenerate root region and no objects.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the config does not validate.
    pub fn empty(config: OctreeConfig) -> Result<Self> {
        config.validate().map_err(Self::log_and_return_error)?;
        Ok(Self {
            nodes: vec![OctreeNode::new(AABB::ZERO, 0)],
            config,
            locations: FxHashMap::default(),
        })
    }

    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        crate::octree_error!(SOURCE, "{}", error);
        error
    }

    // ===== BUILD =====

    /// Rebuild the whole tree from the current registry contents.
    ///
    /// Drops every child node, recomputes the root region as the bounds of
    /// all registry objects (a zero box at the origin for an empty registry)
    /// and inserts the objects in registry order.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidVolume` if the registry reports a missing, inverted
    ///   or non-finite volume. The tree is left untouched in that case.
    /// - `Error::InvariantViolation` if an object could not be placed.
    pub fn rebuild<R: ObjectRegistry + ?Sized>(&mut self, registry: &R) -> Result<()> {
        let volumes = Self::collect_volumes(registry)?;

        self.nodes.truncate(1);
        self.locations.clear();
        let root = &mut self.nodes[ROOT];
        root.first_child = None;
        root.clear();
        root.bounds = AABB::enclosing(volumes.iter().copied()).unwrap_or(AABB::ZERO);

        for (index, aabb) in volumes.iter().enumerate() {
            let id = ObjectId(index);
            if !self.insert(ROOT, id, aabb)? {
                crate::octree_warn!(SOURCE, "Object {} could not be stored and was skipped", id);
            }
        }

        let bounds = self.nodes[ROOT].bounds;
        crate::octree_debug!(
            SOURCE,
            "Rebuilt octree: {} objects, {} nodes, bounds {:?} .. {:?}",
            self.locations.len(),
            self.nodes.len(),
            bounds.min,
            bounds.max
        );

        Ok(())
    }

    /// Read and validate every registry volume up front.
    fn collect_volumes<R: ObjectRegistry + ?Sized>(registry: &R) -> Result<Vec<AABB>> {
        let count = registry.object_count();
        let mut volumes = Vec::with_capacity(count);

        for index in 0..count {
            let aabb = registry.bounding_volume(index).ok_or_else(|| {
                Self::log_and_return_error(Error::InvalidVolume(format!(
                    "registry reports {} objects but index {} is missing",
                    count, index
                )))
            })?;
            if !aabb.is_valid() {
                return Err(Self::log_and_return_error(Error::InvalidVolume(format!(
                    "object #{} has bounds {:?} .. {:?}",
                    index, aabb.min, aabb.max
                ))));
            }
            volumes.push(aabb);
        }

        Ok(volumes)
    }

    /// Insert one more object into the current tree.
    ///
    /// Mostly used internally by `rebuild`. The object must lie within the
    /// root region established by the last rebuild.
    ///
    /// Returns `Ok(false)` if `id` is already stored or storage could not
    /// be allocated.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidVolume` for an inverted or non-finite box.
    /// - `Error::ObjectOutsideBounds` if `aabb` is not contained in the root.
    /// - `Error::InvariantViolation` if no node accepted the object.
    pub fn add_object(&mut self, id: ObjectId, aabb: AABB) -> Result<bool> {
        if !aabb.is_valid() {
            return Err(Self::log_and_return_error(Error::InvalidVolume(format!(
                "object {} has bounds {:?} .. {:?}",
                id, aabb.min, aabb.max
            ))));
        }

        if self.locations.contains_key(&id) {
            crate::octree_warn!(SOURCE, "Object {} is already stored, ignoring", id);
            return Ok(false);
        }

        let root_bounds = self.nodes[ROOT].bounds;
        if !root_bounds.contains(&aabb) {
            return Err(Self::log_and_return_error(Error::ObjectOutsideBounds(format!(
                "object {} ({:?} .. {:?}) is not inside the root region ({:?} .. {:?})",
                id, aabb.min, aabb.max, root_bounds.min, root_bounds.max
            ))));
        }

        self.insert(ROOT, id, &aabb)
    }

    /// Empty every node's object list. Subdivided nodes stay subdivided.
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
        self.locations.clear();
    }

    /// Place an object in the subtree rooted at `node_idx`.
    ///
    /// Returns `Ok(false)` when the object does not touch the node's region
    /// (or storage could not be allocated): the caller tries its next
    /// candidate.
    fn insert(&mut self, node_idx: usize, id: ObjectId, aabb: &AABB) -> Result<bool> {
        let node = &self.nodes[node_idx];
        if !node.bounds.intersects(aabb) {
            return Ok(false);
        }

        let placed = if !node.is_subdivided() && node.objects.len() < self.config.capacity {
            self.store_local(node_idx, id, aabb)
        } else if !node.is_subdivided() && !self.subdivide(node_idx)? {
            // Max depth: capacity becomes soft
            self.store_local(node_idx, id, aabb)
        } else {
            self.insert_into_children(node_idx, id, aabb)?
        };

        if placed {
            self.nodes[node_idx].grow_content(aabb);
        }
        Ok(placed)
    }

    fn insert_into_children(&mut self, node_idx: usize, id: ObjectId, aabb: &AABB) -> Result<bool> {
        let mut touched_any = false;
        for child in self.nodes[node_idx].children() {
            touched_any |= self.nodes[child].bounds.intersects(aabb);
            if self.insert(child, id, aabb)? {
                return Ok(true);
            }
        }

        if touched_any {
            // A child refused for lack of memory
            return Ok(false);
        }

        let node = &self.nodes[node_idx];
        Err(Self::log_and_return_error(Error::InvariantViolation(format!(
            "no child of node {} (depth {}) accepted object {} ({:?} .. {:?})",
            node_idx, node.depth, id, aabb.min, aabb.max
        ))))
    }

    fn store_local(&mut self, node_idx: usize, id: ObjectId, aabb: &AABB) -> bool {
        let objects = &mut self.nodes[node_idx].objects;
        if objects.try_reserve(1).is_err() {
            crate::octree_warn!(SOURCE, "Out of memory storing object {} in node {}", id, node_idx);
            return false;
        }
        objects.push(id);
        self.locations.insert(id, (node_idx, *aabb));
        true
    }

    /// Split a leaf into 8 octants and hand its objects down.
    ///
    /// Redistribution is child-major: child 0 takes every local object it
    /// touches, then child 1 scans what is left, and so on. Objects no child
    /// takes stay in this node.
    fn subdivide(&mut self, node_idx: usize) -> Result<bool> {
        let (bounds, depth) = {
            let node = &self.nodes[node_idx];
            (node.bounds, node.depth)
        };

        if depth >= self.config.max_depth {
            return Ok(false);
        }
        if self.nodes.try_reserve(CHILD_COUNT).is_err() {
            crate::octree_warn!(SOURCE, "Out of memory subdividing node {}", node_idx);
            return Ok(false);
        }

        let first_child = self.nodes.len();
        for octant in 0..CHILD_COUNT {
            self.nodes.push(OctreeNode::new(octant_bounds(&bounds, octant), depth + 1));
        }
        self.nodes[node_idx].first_child = Some(first_child);

        crate::octree_trace!(
            SOURCE,
            "Subdivided node {} at depth {} into nodes {}..{}",
            node_idx,
            depth,
            first_child,
            first_child + CHILD_COUNT
        );

        let mut pending = std::mem::take(&mut self.nodes[node_idx].objects);
        for child in first_child..first_child + CHILD_COUNT {
            let mut i = 0;
            while i < pending.len() {
                let id = pending[i];
                let aabb = self.location_bounds(id)?;
                if self.insert(child, id, &aabb)? {
                    pending.remove(i);
                } else {
                    i += 1;
                }
            }
        }
        self.nodes[node_idx].objects = pending;

        Ok(true)
    }

    fn location_bounds(&self, id: ObjectId) -> Result<AABB> {
        match self.locations.get(&id) {
            Some((_, aabb)) => Ok(*aabb),
            None => Err(Self::log_and_return_error(Error::InvariantViolation(format!(
                "object {} is stored in a node but missing from the identity cache",
                id
            )))),
        }
    }

    // ===== QUERIES =====

    /// Number of objects held by the tree (sum of every node's local list).
    pub fn object_count(&self) -> usize {
        self.count_recursive(ROOT)
    }

    fn count_recursive(&self, node_idx: usize) -> usize {
        let node = &self.nodes[node_idx];
        node.objects.len()
            + node.children().map(|child| self.count_recursive(child)).sum::<usize>()
    }

    /// Whether the object overlaps any other object stored in the tree.
    ///
    /// Returns `false` for an id the tree does not hold.
    pub fn is_colliding(&self, id: ObjectId) -> bool {
        match self.locations.get(&id) {
            Some((_, aabb)) => self.is_colliding_aabb(aabb, Some(id)),
            None => false,
        }
    }

    /// Whether `bounds` overlaps any stored object other than `exclude`.
    pub fn is_colliding_aabb(&self, bounds: &AABB, exclude: Option<ObjectId>) -> bool {
        self.any_overlap_recursive(ROOT, bounds, exclude)
    }

    fn any_overlap_recursive(&self, node_idx: usize, query: &AABB, exclude: Option<ObjectId>) -> bool {
        let node = &self.nodes[node_idx];
        match node.content {
            Some(content) if content.intersects(query) => {}
            _ => return false,
        }

        for &other in &node.objects {
            if Some(other) == exclude {
                continue;
            }
            if let Some((_, other_aabb)) = self.locations.get(&other) {
                if other_aabb.intersects(query) {
                    return true;
                }
            }
        }

        node.children()
            .any(|child| self.any_overlap_recursive(child, query, exclude))
    }

    /// Append every stored object overlapping `bounds` to `results`.
    ///
    /// Each object appears at most once.
    pub fn query_overlaps(&self, bounds: &AABB, results: &mut Vec<ObjectId>) {
        self.query_recursive(ROOT, bounds, results);
    }

    fn query_recursive(&self, node_idx: usize, query: &AABB, results: &mut Vec<ObjectId>) {
        let node = &self.nodes[node_idx];
        match node.content {
            Some(content) if content.intersects(query) => {}
            _ => return,
        }

        for &id in &node.objects {
            if let Some((_, aabb)) = self.locations.get(&id) {
                if aabb.intersects(query) {
                    results.push(id);
                }
            }
        }

        for child in node.children() {
            self.query_recursive(child, query, results);
        }
    }

    /// Every overlapping pair `(a, b)` with `a < b`, sorted ascending.
    pub fn colliding_pairs(&self) -> Vec<(ObjectId, ObjectId)> {
        let mut ids: Vec<ObjectId> = self.locations.keys().copied().collect();
        ids.sort_unstable();

        let mut pairs = Vec::new();
        let mut hits = Vec::new();
        for id in ids {
            let (_, aabb) = self.locations[&id];
            hits.clear();
            self.query_overlaps(&aabb, &mut hits);
            pairs.extend(hits.iter().filter(|&&other| other > id).map(|&other| (id, other)));
        }

        pairs.sort_unstable();
        pairs
    }

    /// Whether the tree currently holds `id`.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Region and depth of the node currently holding `id`.
    pub fn node_of(&self, id: ObjectId) -> Option<(AABB, u32)> {
        self.locations.get(&id).map(|&(node_idx, _)| {
            let node = &self.nodes[node_idx];
            (node.bounds, node.depth)
        })
    }

    /// Region covered by the root node.
    pub fn bounds(&self) -> AABB {
        self.nodes[ROOT].bounds
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest existing node.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    // ===== DEBUG DRAW =====

    /// Queue one wireframe box per node, parents before children.
    pub fn draw(&self, queue: &mut dyn RenderQueue) {
        self.draw_recursive(ROOT, queue);
    }

    fn draw_recursive(&self, node_idx: usize, queue: &mut dyn RenderQueue) {
        let node = &self.nodes[node_idx];
        let transform = Mat4::from_translation(node.bounds.center())
            * Mat4::from_scale(node.bounds.size());
        queue.submit(transform, WIRE_COLOR, DrawMode::Wireframe);

        for child in node.children() {
            self.draw_recursive(child, queue);
        }
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
