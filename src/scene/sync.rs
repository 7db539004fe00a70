use std::collections::HashSet;

use glam::Vec3;

use super::registry::{HandleAllocator, MeshHandle, MeshRegistry};
use crate::geometry::{self, MeshSpec};
use crate::layout::{self, CameraFraming};
use crate::shape::ShapeRecord;

/// A mesh to create and where to put it
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPlacement {
    pub handle: MeshHandle,
    pub shape_id: u64,
    pub spec: MeshSpec,
    pub position: Vec3,
}

/// One mutation of the live scene
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    Remove(MeshHandle),
    Add(MeshPlacement),
    FrameCamera(CameraFraming),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub registry: MeshRegistry,
    pub commands: Vec<SceneCommand>,
}

/// Full teardown of `previous` followed by a rebuild from `shapes`.
///
/// Layout slots follow the index in `shapes`, including entries that are
/// skipped because their type is not drawable or their id repeats.
pub fn plan_sync(previous: &MeshRegistry, shapes: &[ShapeRecord], handles: &mut HandleAllocator) -> SyncPlan {
    let mut old: Vec<MeshHandle> = previous.handles().collect();
    old.sort_unstable();

    let mut commands: Vec<SceneCommand> = old.into_iter().map(SceneCommand::Remove).collect();
    let mut registry = MeshRegistry::new();
    let mut seen = HashSet::with_capacity(shapes.len());

    for (index, shape) in shapes.iter().enumerate() {
        let Some(spec) = geometry::resolve(&shape.shape_type) else {
            log::debug!("Skipping shape {} ({:?}): unrenderable type", shape.id, shape.shape_type);
            continue;
        };
        if !seen.insert(shape.id) {
            log::warn!("Skipping duplicate shape id {} ({})", shape.id, shape.name);
            continue;
        }
        let Some(position) = layout::ring_position(index, shapes.len()) else {
            continue;
        };

        let handle = handles.allocate();
        registry.insert(shape.id, handle);
        commands.push(SceneCommand::Add(MeshPlacement {
            handle,
            shape_id: shape.id,
            spec,
            position,
        }));
    }

    if let Some(framing) = layout::camera_framing(shapes.len()) {
        commands.push(SceneCommand::FrameCamera(framing));
    }

    SyncPlan { registry, commands }
}

/// Owns the mesh registry across sync calls
#[derive(Debug, Default)]
pub struct SceneSync {
    registry: MeshRegistry,
    handles: HandleAllocator,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    /// Replace the registry for `shapes` and return the commands that bring
    /// the live scene in line with it
    pub fn sync(&mut self, shapes: &[ShapeRecord]) -> Vec<SceneCommand> {
        let SyncPlan { registry, commands } = plan_sync(&self.registry, shapes, &mut self.handles);
        log::debug!(
            "Scene sync: {} shapes in, {} meshes out, {} removed",
            shapes.len(),
            registry.len(),
            self.registry.len()
        );
        self.registry = registry;
        commands
    }

    /// Drop every registered mesh, returning the removals to apply
    pub fn clear(&mut self) -> Vec<SceneCommand> {
        let mut old: Vec<MeshHandle> = self.registry.handles().collect();
        old.sort_unstable();
        self.registry = MeshRegistry::new();
        old.into_iter().map(SceneCommand::Remove).collect()
    }
}
