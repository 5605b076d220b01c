use glam::Vec3;
use crate::render::{DrawMode, RecordingRenderQueue};
use super::*;

fn cube(x: f32, y: f32, z: f32, size: f32) -> AABB {
    AABB::from_center_size(Vec3::new(x, y, z), Vec3::splat(size))
}

/// Two unit cubes spanning the root region to [-10, 10]³.
fn corners() -> Vec<AABB> {
    vec![cube(-9.5, -9.5, -9.5, 1.0), cube(9.5, 9.5, 9.5, 1.0)]
}

fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-5
}

/// Every cached location points at the node whose list holds the object.
fn assert_identity_cache_consistent(octree: &Octree) {
    let mut seen = 0;
    for (node_idx, node) in octree.nodes.iter().enumerate() {
        for id in &node.objects {
            let (cached_node, _) = octree.locations[id];
            assert_eq!(cached_node, node_idx, "stale location for {}", id);
            seen += 1;
        }
    }
    assert_eq!(seen, octree.locations.len());
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_empty_registry() {
    let registry: Vec<AABB> = Vec::new();
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.object_count(), 0);
    assert_eq!(octree.node_count(), 1);
    assert_eq!(octree.bounds(), AABB::ZERO);
    assert!(!octree.is_colliding(ObjectId(0)));
}

#[test]
fn test_empty_constructor_does_not_populate() {
    let octree = Octree::empty(OctreeConfig::default()).unwrap();
    assert_eq!(octree.object_count(), 0);
    assert_eq!(octree.bounds(), AABB::ZERO);
}

#[test]
fn test_invalid_config_rejected() {
    let registry = corners();
    let result = Octree::with_config(OctreeConfig::default().with_capacity(0), &registry);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_root_bounds_cover_registry() {
    let mut registry = corners();
    registry.push(cube(3.0, -12.0, 0.0, 2.0));
    let octree = Octree::new(&registry).unwrap();

    let bounds = octree.bounds();
    assert_eq!(bounds.min, Vec3::new(-10.0, -13.0, -10.0));
    assert_eq!(bounds.max, Vec3::new(10.0, 10.0, 10.0));
    for aabb in &registry {
        assert!(bounds.contains(aabb));
    }
}

// ============================================================================
// Subdivision
// ============================================================================

#[test]
fn test_capacity_objects_stay_in_root() {
    let mut registry = corners();
    registry.push(cube(0.0, 0.0, 0.0, 1.0));
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.node_count(), 1);
    assert_eq!(octree.nodes[ROOT].objects, vec![ObjectId(0), ObjectId(1), ObjectId(2)]);
}

#[test]
fn test_fourth_object_triggers_subdivision() {
    let mut registry = corners();
    registry.push(cube(-5.0, 5.0, -5.0, 1.0));
    registry.push(cube(5.0, -5.0, 5.0, 1.0));
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.node_count(), 9);
    assert!(octree.nodes[ROOT].is_subdivided());
    assert!(octree.nodes[ROOT].objects.is_empty());
    assert_eq!(octree.object_count(), 4);

    // Octant index: bit2 = x, bit1 = y, bit0 = z
    let first = octree.nodes[ROOT].first_child.unwrap();
    assert_eq!(octree.nodes[first].objects, vec![ObjectId(0)]);
    assert_eq!(octree.nodes[first + 2].objects, vec![ObjectId(2)]);
    assert_eq!(octree.nodes[first + 5].objects, vec![ObjectId(3)]);
    assert_eq!(octree.nodes[first + 7].objects, vec![ObjectId(1)]);

    let (node_bounds, depth) = octree.node_of(ObjectId(3)).unwrap();
    assert_eq!(depth, 1);
    assert_eq!(node_bounds, AABB::new(Vec3::new(0.0, -10.0, 0.0), Vec3::new(10.0, 0.0, 10.0)));

    assert_identity_cache_consistent(&octree);
}

#[test]
fn test_straddling_object_goes_to_first_touching_child() {
    let mut registry = corners();
    registry.push(cube(0.0, 0.0, 0.0, 2.0)); // touches all 8 octants
    registry.push(cube(5.0, 5.0, 5.0, 1.0));
    let octree = Octree::new(&registry).unwrap();

    let first = octree.nodes[ROOT].first_child.unwrap();
    assert_eq!(octree.nodes[first].objects, vec![ObjectId(0), ObjectId(2)]);
    assert_eq!(octree.nodes[first + 7].objects, vec![ObjectId(1), ObjectId(3)]);
}

#[test]
fn test_children_tile_parent() {
    let mut registry = corners();
    for i in 0..40 {
        let t = i as f32 * 0.45 - 9.0;
        registry.push(cube(t, -t * 0.5, t * 0.8, 0.5));
    }
    let octree = Octree::new(&registry).unwrap();
    assert!(octree.node_count() > 9);

    for node in octree.nodes.iter().filter(|n| n.is_subdivided()) {
        let center = node.bounds.center();
        let quarter = node.bounds.size() * 0.25;
        let mut volume = 0.0;

        for (octant, child_idx) in node.children().enumerate() {
            let child = &octree.nodes[child_idx];
            let sign = |bit: usize| if octant & bit == 0 { -1.0 } else { 1.0 };
            let expected_center = center
                + Vec3::new(sign(4) * quarter.x, sign(2) * quarter.y, sign(1) * quarter.z);

            assert_eq!(child.depth, node.depth + 1);
            assert!(approx_eq(child.bounds.center(), expected_center));
            assert!(approx_eq(child.bounds.half_size(), node.bounds.half_size() * 0.5));
            assert!(node.bounds.contains(&child.bounds));
            volume += child.bounds.size().x * child.bounds.size().y * child.bounds.size().z;
        }

        let size = node.bounds.size();
        assert!((volume - size.x * size.y * size.z).abs() < 1e-2);

        // Open interiors of siblings never overlap
        let children: Vec<AABB> = node.children().map(|c| octree.nodes[c].bounds).collect();
        for i in 0..children.len() {
            for j in (i + 1)..children.len() {
                let (a, b) = (children[i], children[j]);
                let separated = (0..3).any(|axis| a.max[axis] <= b.min[axis] || b.max[axis] <= a.min[axis]);
                assert!(separated, "octants {} and {} overlap", i, j);
            }
        }
    }

    assert_identity_cache_consistent(&octree);
}

#[test]
fn test_max_depth_never_subdivides() {
    let mut registry = corners();
    for _ in 0..30 {
        registry.push(cube(7.0, 7.0, 7.0, 0.1));
    }
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.object_count(), 32);
    assert_eq!(octree.depth(), 3);
    for node in octree.nodes.iter().filter(|n| n.depth == 3) {
        assert!(!node.is_subdivided());
    }
    let crowded = octree.nodes.iter().map(|n| n.objects.len()).max().unwrap();
    assert!(crowded > octree.config().capacity);

    let (_, depth) = octree.node_of(ObjectId(10)).unwrap();
    assert_eq!(depth, 3);
}

#[test]
fn test_zero_max_depth_keeps_everything_in_root() {
    let mut registry = corners();
    for i in 0..10 {
        registry.push(cube(i as f32 - 5.0, 0.0, 0.0, 0.5));
    }
    let config = OctreeConfig::default().with_max_depth(0);
    let octree = Octree::with_config(config, &registry).unwrap();

    assert_eq!(octree.node_count(), 1);
    assert_eq!(octree.nodes[ROOT].objects.len(), 12);
}

#[test]
fn test_migration_can_subdivide_children() {
    // Capacity 1: the second object splits the root, and every object
    // that lands in an occupied child splits that child in turn
    let mut registry = corners();
    registry.push(cube(-8.0, -8.0, -8.0, 0.5));
    let config = OctreeConfig::default().with_capacity(1);
    let octree = Octree::with_config(config, &registry).unwrap();

    assert_eq!(octree.object_count(), 3);
    let (_, depth_a) = octree.node_of(ObjectId(0)).unwrap();
    let (_, depth_c) = octree.node_of(ObjectId(2)).unwrap();
    assert!(depth_a >= 2);
    assert!(depth_c >= 2);
    assert_identity_cache_consistent(&octree);
}

// ============================================================================
// Insertion contract
// ============================================================================

#[test]
fn test_node_rejects_disjoint_object() {
    let mut octree = Octree::empty(OctreeConfig::default()).unwrap();
    octree.nodes[ROOT].bounds = cube(0.0, 0.0, 0.0, 2.0);

    let far = cube(10.0, 10.0, 10.0, 1.0);
    assert_eq!(octree.insert(ROOT, ObjectId(0), &far), Ok(false));
    assert_eq!(octree.object_count(), 0);

    let touching = cube(1.5, 0.0, 0.0, 1.0);
    assert_eq!(octree.insert(ROOT, ObjectId(1), &touching), Ok(true));
}

#[test]
fn test_add_object_checks_root_containment() {
    let registry = corners();
    let mut octree = Octree::new(&registry).unwrap();

    let result = octree.add_object(ObjectId(2), cube(9.8, 0.0, 0.0, 1.0));
    assert!(matches!(result, Err(Error::ObjectOutsideBounds(_))));
    assert_eq!(octree.object_count(), 2);

    assert_eq!(octree.add_object(ObjectId(2), cube(0.0, 0.0, 0.0, 1.0)), Ok(true));
    assert_eq!(octree.object_count(), 3);
    assert!(octree.contains(ObjectId(2)));
}

#[test]
fn test_add_object_ignores_known_id() {
    let registry = corners();
    let mut octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.add_object(ObjectId(0), cube(0.0, 0.0, 0.0, 1.0)), Ok(false));
    assert_eq!(octree.object_count(), 2);
}

#[test]
fn test_add_object_rejects_inverted_box() {
    let registry = corners();
    let mut octree = Octree::new(&registry).unwrap();

    let inverted = AABB::new(Vec3::ONE, Vec3::ZERO);
    assert!(matches!(
        octree.add_object(ObjectId(5), inverted),
        Err(Error::InvalidVolume(_))
    ));
}

#[test]
fn test_unplaceable_object_is_invariant_violation() {
    let mut octree = Octree::empty(OctreeConfig::default()).unwrap();
    octree.nodes[ROOT].bounds = cube(0.0, 0.0, 0.0, 20.0);
    octree.nodes[ROOT].first_child = Some(1);
    for _ in 0..CHILD_COUNT {
        // Children that do not cover their parent
        octree.nodes.push(OctreeNode::new(cube(100.0, 100.0, 100.0, 1.0), 1));
    }

    let result = octree.insert(ROOT, ObjectId(0), &cube(0.0, 0.0, 0.0, 1.0));
    assert!(matches!(result, Err(Error::InvariantViolation(_))));
}

// ============================================================================
// Clear / rebuild
// ============================================================================

#[test]
fn test_clear_keeps_structure() {
    let mut registry = corners();
    registry.push(cube(-5.0, 5.0, -5.0, 1.0));
    registry.push(cube(5.0, -5.0, 5.0, 1.0));
    let mut octree = Octree::new(&registry).unwrap();
    let nodes_before = octree.node_count();

    octree.clear();

    assert_eq!(octree.object_count(), 0);
    assert_eq!(octree.node_count(), nodes_before);
    assert!(octree.nodes[ROOT].is_subdivided());
    assert!(!octree.is_colliding(ObjectId(0)));

    // Structure is reused by later insertions
    assert_eq!(octree.add_object(ObjectId(0), registry[0]), Ok(true));
    assert_eq!(octree.node_of(ObjectId(0)).unwrap().1, 1);
}

#[test]
fn test_rebuild_is_idempotent() {
    let mut registry = corners();
    for i in 0..20 {
        registry.push(cube(i as f32 * 0.7 - 7.0, (i % 5) as f32, -(i as f32) * 0.3, 1.0));
    }
    let mut octree = Octree::new(&registry).unwrap();
    let (count, bounds, nodes) = (octree.object_count(), octree.bounds(), octree.node_count());

    octree.rebuild(&registry).unwrap();

    assert_eq!(octree.object_count(), count);
    assert_eq!(octree.bounds(), bounds);
    assert_eq!(octree.node_count(), nodes);
    assert_eq!(count, registry.len());
}

#[test]
fn test_rebuild_follows_registry_changes() {
    let mut registry = corners();
    registry.push(cube(0.0, 0.0, 0.0, 1.0));
    registry.push(cube(1.0, 0.0, 0.0, 1.0));
    let mut octree = Octree::new(&registry).unwrap();

    registry.push(cube(30.0, 30.0, 30.0, 1.0));
    registry.push(cube(30.5, 30.0, 30.0, 1.0));
    octree.rebuild(&registry).unwrap();

    assert_eq!(octree.object_count(), 6);
    assert_eq!(octree.bounds().max, Vec3::splat(30.5) + Vec3::new(0.5, 0.0, 0.0));
    assert!(octree.is_colliding(ObjectId(4)));
    assert!(octree.is_colliding(ObjectId(5)));
    assert_identity_cache_consistent(&octree);
}

#[test]
fn test_rebuild_with_invalid_volume_keeps_tree() {
    let mut registry = corners();
    let mut octree = Octree::new(&registry).unwrap();

    registry.push(AABB::new(Vec3::splat(f32::NAN), Vec3::ONE));
    assert!(matches!(octree.rebuild(&registry), Err(Error::InvalidVolume(_))));
    assert_eq!(octree.object_count(), 2);
}

// ============================================================================
// Overlap queries
// ============================================================================

#[test]
fn test_colliding_before_subdivision() {
    let registry = vec![
        cube(0.0, 0.0, 0.0, 1.0),
        cube(0.0, 0.0, 0.1, 1.0),
        cube(50.0, 50.0, 50.0, 1.0),
    ];
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(octree.node_count(), 1);
    assert!(octree.is_colliding(ObjectId(0)));
    assert!(octree.is_colliding(ObjectId(1)));
    assert!(!octree.is_colliding(ObjectId(2)));
}

#[test]
fn test_object_does_not_collide_with_itself() {
    let registry = vec![cube(0.0, 0.0, 0.0, 1.0)];
    let octree = Octree::new(&registry).unwrap();
    assert!(!octree.is_colliding(ObjectId(0)));
}

#[test]
fn test_overlap_found_across_octants() {
    // B touches octant 0 first and is stored there, but overlaps A only
    // inside octant 7
    let mut registry = corners();
    registry.push(AABB::new(Vec3::splat(-1.0), Vec3::splat(0.5))); // B
    registry.push(AABB::new(Vec3::splat(0.2), Vec3::splat(1.0))); // A
    let octree = Octree::new(&registry).unwrap();

    let first = octree.nodes[ROOT].first_child.unwrap();
    assert!(octree.nodes[first].objects.contains(&ObjectId(2)));
    assert!(octree.nodes[first + 7].objects.contains(&ObjectId(3)));

    assert!(octree.is_colliding(ObjectId(3)));
    assert!(octree.is_colliding(ObjectId(2)));
    assert!(!octree.is_colliding(ObjectId(0)));
    assert!(!octree.is_colliding(ObjectId(1)));
}

#[test]
fn test_is_colliding_aabb_and_query_overlaps() {
    let mut registry = corners();
    registry.push(cube(0.0, 0.0, 0.0, 1.0));
    registry.push(cube(3.0, 3.0, 3.0, 1.0));
    let octree = Octree::new(&registry).unwrap();

    let probe = cube(0.5, 0.5, 0.5, 0.5);
    assert!(octree.is_colliding_aabb(&probe, None));
    assert!(!octree.is_colliding_aabb(&probe, Some(ObjectId(2))));

    let mut results = Vec::new();
    octree.query_overlaps(&AABB::new(Vec3::ZERO, Vec3::splat(10.0)), &mut results);
    results.sort();
    assert_eq!(results, vec![ObjectId(1), ObjectId(2), ObjectId(3)]);
}

#[test]
fn test_colliding_pairs_sorted_and_canonical() {
    let registry = vec![
        cube(5.0, 5.0, 5.0, 1.0),
        cube(0.0, 0.0, 0.0, 1.0),
        cube(5.5, 5.0, 5.0, 1.0),
        cube(0.0, 0.9, 0.0, 1.0),
        cube(-5.0, -5.0, -5.0, 1.0),
    ];
    let octree = Octree::new(&registry).unwrap();

    assert_eq!(
        octree.colliding_pairs(),
        vec![(ObjectId(0), ObjectId(2)), (ObjectId(1), ObjectId(3))]
    );
}

// ============================================================================
// Draw
// ============================================================================

#[test]
fn test_draw_emits_one_wireframe_per_node() {
    let mut registry = corners();
    registry.push(cube(-5.0, 5.0, -5.0, 1.0));
    registry.push(cube(5.0, -5.0, 5.0, 1.0));
    let octree = Octree::new(&registry).unwrap();

    let mut queue = RecordingRenderQueue::new();
    octree.draw(&mut queue);

    assert_eq!(queue.len(), octree.node_count());
    assert_eq!(queue.wireframe_count(), queue.len());

    let root = queue.commands()[0];
    assert!(approx_eq(root.center(), Vec3::ZERO));
    assert!(approx_eq(root.size(), Vec3::splat(20.0)));
    assert_eq!(root.color, Vec3::ONE);
    assert_eq!(root.mode, DrawMode::Wireframe);

    // Pre-order: octant 0 right after the root
    let child = queue.commands()[1];
    assert!(approx_eq(child.center(), Vec3::splat(-5.0)));
    assert!(approx_eq(child.size(), Vec3::splat(10.0)));
}
