use glam::{Mat4, Vec3};

/// How a submitted box is rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Filled faces
    Solid,
    /// Edges only (wireframe)
    Wireframe,
}

/// Host render queue receiving unit-cube draw commands.
///
/// `transform` maps the unit cube centered at the origin onto the box
/// to draw (translation to the box center, scale to its size).
pub trait RenderQueue {
    /// Queue a unit cube for drawing
    fn submit(&mut self, transform: Mat4, color: Vec3, mode: DrawMode);
}

/// A single queued draw command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    /// Unit cube to world transform
    pub transform: Mat4,
    /// RGB color
    pub color: Vec3,
    /// Fill mode
    pub mode: DrawMode,
}

impl RenderCommand {
    /// Center of the drawn box (translation part of the transform)
    pub fn center(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Size of the drawn box (diagonal of the transform)
    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.transform.x_axis.x,
            self.transform.y_axis.y,
            self.transform.z_axis.z,
        )
    }
}

/// Render queue that only records what it is given.
///
/// Used by tests and by headless hosts to inspect `Octree::draw` output.
#[derive(Debug, Default)]
pub struct RecordingRenderQueue {
    commands: Vec<RenderCommand>,
}

impl RecordingRenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in submission order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of wireframe commands recorded
    pub fn wireframe_count(&self) -> usize {
        self.commands.iter().filter(|c| c.mode == DrawMode::Wireframe).count()
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget every recorded command (start of a new frame)
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderQueue for RecordingRenderQueue {
    fn submit(&mut self, transform: Mat4, color: Vec3, mode: DrawMode) {
        self.commands.push(RenderCommand { transform, color, mode });
    }
}

#[cfg(test)]
#[path = "render_queue_tests.rs"]
mod tests;
