//! Debug rendering seam
//!
//! The octree does not render anything itself. `Octree::draw` pushes one
//! box command per node into a host-provided [`RenderQueue`].

mod render_queue;

pub use render_queue::{DrawMode, RenderCommand, RenderQueue, RecordingRenderQueue};
