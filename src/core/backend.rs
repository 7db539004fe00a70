use crate::camera::OrbitCamera;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::scene::{MeshHandle, Scene, SceneMesh};
use crate::shape::ShapeRecord;

use super::display_context::Viewport;

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a OrbitCamera,
    /// Name shown by the overlay label, if any shape is picked
    pub highlighted: Option<&'a str>,
    pub shapes: &'a [ShapeRecord],
    pub frame: FrameInfo,
    pub fps: f32,
}

/// Requests raised by the overlay UI during a frame.
///
/// The canvas handles `ClearSelection` itself; the rest are store edits passed
/// up to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    ClearSelection,
    CreateShape { name: String, shape_type: String },
    DeleteShape(u64),
}

/// GPU-side executor of scene commands and frames.
///
/// `release_meshes` and `release_surface` are called once each during
/// teardown, in that order, and must not depend on each other succeeding.
pub trait RenderBackend {
    /// Acquire the drawing surface at the given size
    fn mount(&mut self, viewport: Viewport) -> Result<()>;

    /// Upload a mesh placed in the scene
    fn add_mesh(&mut self, mesh: &SceneMesh) -> Result<()>;

    /// Destroy the GPU resources of a removed mesh. Unknown handles are ignored.
    fn remove_mesh(&mut self, handle: MeshHandle);

    fn resize(&mut self, viewport: Viewport);

    fn render(&mut self, frame: &FrameContext<'_>) -> Result<Vec<OverlayAction>>;

    /// Destroy every mesh still uploaded
    fn release_meshes(&mut self) -> Result<()>;

    /// Give back the surface and overlay
    fn release_surface(&mut self) -> Result<()>;

    /// Number of meshes currently holding GPU resources
    fn mesh_count(&self) -> usize;
}
