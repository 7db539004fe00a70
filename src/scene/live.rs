use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;

use super::registry::MeshHandle;
use super::sync::{MeshPlacement, SceneCommand};
use crate::geometry::{MeshData, MeshSpec};
use crate::layout::CameraFraming;
use crate::math::AABB;
use crate::shape::ShapeKind;

/// A mesh currently in the scene
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub handle: MeshHandle,
    pub shape_id: u64,
    pub spec: MeshSpec,
    pub position: Vec3,
    pub data: Arc<MeshData>,
}

impl SceneMesh {
    pub fn world_bounds(&self) -> AABB {
        self.data.bounds.translated(self.position)
    }
}

/// CPU-side scene graph: the meshes in insertion order plus the last framing.
///
/// Geometry is tessellated once per shape kind and shared between meshes.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<SceneMesh>,
    framing: Option<CameraFraming>,
    geometry_cache: HashMap<ShapeKind, Arc<MeshData>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: &SceneCommand) {
        match command {
            SceneCommand::Remove(handle) => {
                self.remove(*handle);
            }
            SceneCommand::Add(placement) => self.add(placement),
            SceneCommand::FrameCamera(framing) => self.framing = Some(*framing),
        }
    }

    pub fn apply_all(&mut self, commands: &[SceneCommand]) {
        for command in commands {
            self.apply(command);
        }
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&SceneMesh> {
        self.meshes.iter().find(|m| m.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn framing(&self) -> Option<CameraFraming> {
        self.framing
    }

    /// Remove every mesh, returning their handles
    pub fn clear(&mut self) -> Vec<MeshHandle> {
        self.meshes.drain(..).map(|m| m.handle).collect()
    }

    fn add(&mut self, placement: &MeshPlacement) {
        let data = self
            .geometry_cache
            .entry(placement.spec.kind)
            .or_insert_with(|| Arc::new(placement.spec.tessellate()))
            .clone();

        self.meshes.push(SceneMesh {
            handle: placement.handle,
            shape_id: placement.shape_id,
            spec: placement.spec,
            position: placement.position,
            data,
        });
    }

    fn remove(&mut self, handle: MeshHandle) -> Option<SceneMesh> {
        let index = self.meshes.iter().position(|m| m.handle == handle)?;
        Some(self.meshes.remove(index))
    }
}
