//! Octree3D demo host
//!
//! Builds a scene of random unit cubes, indexes it with an octree and
//! compares the octree's collision results and timing with the
//! brute-force strategy. The octree is drawn into a recording render queue
//! in place of a real renderer.
//!
//! Usage: `octree_3d_demo [object_count] [seed]`

use std::process::ExitCode;
use std::time::Instant;

use octree_3d::glam::Vec3;
use octree_3d::octree3d::{
    AABB, BoundingObjectManager, BruteForceCollider, CollisionQuery, Octree, Result,
};
use octree_3d::octree3d::render::RecordingRenderQueue;
use octree_3d::{octree_error, octree_info, octree_warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SOURCE: &str = "octree3d::demo";

/// Cubes are scattered in [-SCENE_EXTENT, SCENE_EXTENT]³
const SCENE_EXTENT: f32 = 10.0;
const DEFAULT_OBJECT_COUNT: usize = 512;
/// Simulated frames per strategy
const FRAMES: u32 = 10;

struct DemoArgs {
    object_count: usize,
    seed: u64,
}

impl DemoArgs {
    fn from_env() -> Self {
        let mut args = std::env::args().skip(1);
        let object_count = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or(DEFAULT_OBJECT_COUNT);
        let seed = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or_else(|| rand::thread_rng().gen());
        Self { object_count, seed }
    }
}

fn build_scene(args: &DemoArgs) -> BoundingObjectManager {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut manager = BoundingObjectManager::new();
    for i in 0..args.object_count {
        let center = Vec3::new(
            rng.gen_range(-SCENE_EXTENT..SCENE_EXTENT),
            rng.gen_range(-SCENE_EXTENT..SCENE_EXTENT),
            rng.gen_range(-SCENE_EXTENT..SCENE_EXTENT),
        );
        manager.add_object(&format!("Cube_{}", i), AABB::from_center_size(center, Vec3::ONE));
    }
    manager
}

/// Run `FRAMES` collision passes and return (colliding count, ms per frame)
fn measure(strategy: &dyn CollisionQuery, object_count: usize) -> (usize, f64) {
    let start = Instant::now();
    let mut colliding = 0;
    for _ in 0..FRAMES {
        colliding = strategy.colliding_objects(object_count).len();
    }
    let per_frame = start.elapsed().as_secs_f64() * 1000.0 / f64::from(FRAMES);
    (colliding, per_frame)
}

fn run(args: &DemoArgs) -> Result<bool> {
    octree_info!(SOURCE, "Scene: {} cubes, seed {}", args.object_count, args.seed);
    let manager = build_scene(args);

    let start = Instant::now();
    let octree = Octree::new(&manager)?;
    octree_info!(
        SOURCE,
        "Octree built in {:.3} ms: {} nodes, depth {}",
        start.elapsed().as_secs_f64() * 1000.0,
        octree.node_count(),
        octree.depth()
    );

    let stored = octree.object_count();
    if stored != manager.len() {
        octree_error!(SOURCE, "Octree holds {} objects, registry has {}", stored, manager.len());
        return Ok(false);
    }

    let brute = BruteForceCollider::new(&manager)?;
    let (octree_hits, octree_ms) = measure(&octree, manager.len());
    let (brute_hits, brute_ms) = measure(&brute, manager.len());
    octree_info!(SOURCE, "Octree:      {} colliding, {:.3} ms/frame", octree_hits, octree_ms);
    octree_info!(SOURCE, "Brute force: {} colliding, {:.3} ms/frame", brute_hits, brute_ms);

    let disagreements = (0..manager.len())
        .map(octree_3d::octree3d::ObjectId)
        .filter(|&id| octree.is_colliding(id) != brute.is_colliding(id))
        .count();
    if disagreements > 0 {
        octree_error!(SOURCE, "Strategies disagree on {} objects", disagreements);
        return Ok(false);
    }

    let mut queue = RecordingRenderQueue::new();
    octree.draw(&mut queue);
    octree_info!(SOURCE, "Queued {} wireframe boxes", queue.wireframe_count());

    if manager.is_empty() {
        octree_warn!(SOURCE, "Empty scene, nothing to compare");
    }

    Ok(true)
}

fn main() -> ExitCode {
    let args = DemoArgs::from_env();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            octree_error!(SOURCE, "Demo failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
