//! The drawing surface lifecycle: mount, shape updates, input, frames and
//! teardown.

use std::fmt;

use crate::camera::OrbitCamera;
use crate::controls::OrbitControls;
use crate::core::{Controller, FrameContext, Gesture, OverlayAction, PointerEvent, PointerGestures, RenderBackend, Viewport};
use crate::error::{Result, ViewerError};
use crate::frame::{FpsCounter, FrameInfo};
use crate::picking::{self, PickEvent, PickState};
use crate::scene::{MeshRegistry, Scene, SceneCommand, SceneSync};
use crate::shape::ShapeRecord;

/// Teardown stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    DetachControls,
    ReleaseMeshes,
    ReleaseSurface,
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DetachControls => "detach controls",
            Self::ReleaseMeshes => "release meshes",
            Self::ReleaseSurface => "release surface",
        };
        f.write_str(name)
    }
}

/// Outcome of tearing a canvas down. Every step runs even when an earlier one
/// fails.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub failures: Vec<(TeardownStep, ViewerError)>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, step: TeardownStep, result: Result<()>) {
        if let Err(e) = result {
            log::warn!("Teardown step '{}' failed: {}", step, e);
            self.failures.push((step, e));
        }
    }
}

/// A mounted 3D view of a shape list.
///
/// Owns the render backend, the camera and its controls, the live scene and
/// the registry tying meshes to shape ids. Dropping a canvas that was not
/// unmounted still tears it down.
pub struct ShapeCanvas<B: RenderBackend> {
    backend: B,
    viewport: Viewport,
    camera: OrbitCamera,
    controls: OrbitControls,
    gestures: PointerGestures,
    sync: SceneSync,
    scene: Scene,
    shapes: Vec<ShapeRecord>,
    pick_state: PickState,
    fps: FpsCounter,
    torn_down: bool,
}

impl<B: RenderBackend> ShapeCanvas<B> {
    /// Acquire the backend surface and attach camera controls
    pub fn mount(mut backend: B, viewport: Viewport) -> Result<Self> {
        backend.mount(viewport)?;

        let mut controls = OrbitControls::new();
        controls.attach();

        log::info!("Canvas mounted at {}x{}", viewport.width, viewport.height);

        Ok(Self {
            backend,
            viewport,
            camera: OrbitCamera::new(viewport.aspect()),
            controls,
            gestures: PointerGestures::new(),
            sync: SceneSync::new(),
            scene: Scene::new(),
            shapes: Vec::new(),
            pick_state: PickState::new(),
            fps: FpsCounter::new(),
            torn_down: false,
        })
    }

    /// Rebuild the scene for a new shape list.
    ///
    /// Every command is applied even if uploading a mesh fails; the first
    /// upload error is returned afterwards.
    pub fn set_shapes(&mut self, shapes: &[ShapeRecord]) -> Result<()> {
        if self.torn_down {
            return Err(ViewerError::AlreadyReleased("canvas"));
        }

        self.shapes = shapes.to_vec();
        let commands = self.sync.sync(shapes);
        let mut first_error = None;

        for command in &commands {
            self.scene.apply(command);
            match command {
                SceneCommand::Remove(handle) => self.backend.remove_mesh(*handle),
                SceneCommand::Add(placement) => {
                    let Some(mesh) = self.scene.mesh(placement.handle) else {
                        continue;
                    };
                    if let Err(e) = self.backend.add_mesh(mesh) {
                        log::error!("Failed to upload {} for shape {}: {}", placement.handle, placement.shape_id, e);
                        first_error.get_or_insert(e);
                    }
                }
                SceneCommand::FrameCamera(framing) => {
                    self.camera.frame(framing);
                    self.controls.reset();
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Feed one pointer event. Returns the picked shape when the event
    /// completes a click on one.
    pub fn handle_pointer(&mut self, event: PointerEvent, buttons: &impl Controller) -> Option<PickEvent> {
        if self.torn_down {
            return None;
        }

        match self.gestures.handle(event, buttons)? {
            Gesture::Orbit(delta) => self.controls.rotate(delta, self.viewport.height),
            Gesture::Pan(delta) => self.controls.pan(delta, self.viewport.height, &self.camera),
            Gesture::Zoom(lines) => self.controls.zoom(lines),
            Gesture::Click(position) => return self.pick(position.x, position.y),
        }
        None
    }

    /// Resolve a click at a screen position. A hit updates the pick state; a
    /// miss leaves it untouched.
    pub fn pick(&mut self, screen_x: f32, screen_y: f32) -> Option<PickEvent> {
        let record = picking::resolve_click(
            screen_x,
            screen_y,
            &self.viewport,
            &self.camera,
            &self.scene,
            self.sync.registry(),
            &self.shapes,
        )?;
        let event = PickEvent::from(record);
        self.pick_state.apply(&event);
        Some(event)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.torn_down || viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.backend.resize(viewport);
    }

    /// Advance the controls and draw one frame. Returns the overlay requests
    /// the application has to handle.
    pub fn frame(&mut self, info: FrameInfo) -> Result<Vec<OverlayAction>> {
        if self.torn_down {
            return Err(ViewerError::AlreadyReleased("canvas"));
        }

        if let Some(fps) = self.fps.tick(info.delta) {
            log::trace!("FPS: {:.1}", fps);
        }
        self.controls.update(&mut self.camera);

        let context = FrameContext {
            scene: &self.scene,
            camera: &self.camera,
            highlighted: self.pick_state.highlighted(),
            shapes: &self.shapes,
            frame: info,
            fps: self.fps.fps(),
        };
        let actions = self.backend.render(&context)?;

        let mut remaining = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                OverlayAction::ClearSelection => self.pick_state.reset(),
                other => remaining.push(other),
            }
        }
        Ok(remaining)
    }

    /// Tear down explicitly and report what failed
    pub fn unmount(mut self) -> TeardownReport {
        self.teardown()
    }

    fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if self.torn_down {
            return report;
        }
        self.torn_down = true;

        report.record(TeardownStep::DetachControls, self.controls.detach());

        self.sync.clear();
        self.scene.clear();
        report.record(TeardownStep::ReleaseMeshes, self.backend.release_meshes());

        report.record(TeardownStep::ReleaseSurface, self.backend.release_surface());

        log::info!("Canvas unmounted ({} teardown failures)", report.failures.len());
        report
    }

    pub fn is_mounted(&self) -> bool {
        !self.torn_down
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn registry(&self) -> &MeshRegistry {
        self.sync.registry()
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    pub fn pick_state(&self) -> &PickState {
        &self.pick_state
    }

    pub fn pick_state_mut(&mut self) -> &mut PickState {
        &mut self.pick_state
    }
}

impl<B: RenderBackend> Drop for ShapeCanvas<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
