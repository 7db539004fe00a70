//! Screen-space click to shape record resolution.
//!
//! A click becomes a ray from the camera eye through the clicked pixel. Every
//! registered mesh is tested (bounding box first, then its triangles) and the
//! nearest hit is mapped back through the registry to its record.

use glam::{Vec2, Vec3};

use crate::camera::OrbitCamera;
use crate::core::Viewport;
use crate::math::{intersect_aabb, moller_trumbore_intersect, Ray};
use crate::scene::{MeshHandle, MeshRegistry, Scene, SceneMesh};
use crate::shape::ShapeRecord;

/// Reported upward when a click lands on a shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickEvent {
    pub id: u64,
    pub name: String,
}

impl From<&ShapeRecord> for PickEvent {
    fn from(record: &ShapeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
        }
    }
}

/// One ray hit on a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub handle: MeshHandle,
    pub distance: f32,
    pub point: Vec3,
}

/// Normalized device coordinates of a screen point, `None` for a zero-area
/// viewport
pub fn screen_to_ndc(screen: Vec2, viewport: &Viewport) -> Option<Vec2> {
    viewport.to_ndc(screen)
}

/// Nearest hit of `ray` on the mesh's triangles
pub fn intersect_mesh(ray: &Ray, mesh: &SceneMesh) -> Option<Intersection> {
    let bounds = mesh.world_bounds();
    intersect_aabb(ray.origin, ray.direction, bounds.min, bounds.max)?;

    let distance = mesh
        .data
        .triangles(mesh.position)
        .filter_map(|[v0, v1, v2]| moller_trumbore_intersect(ray.origin, ray.direction, v0, v1, v2))
        .map(|hit| hit.t)
        .min_by(f32::total_cmp)?;

    Some(Intersection {
        handle: mesh.handle,
        distance,
        point: ray.at(distance),
    })
}

/// All hits on registered meshes, nearest first. Equal distances keep scene
/// order.
pub fn intersect_scene(ray: &Ray, scene: &Scene, registry: &MeshRegistry) -> Vec<Intersection> {
    let mut hits: Vec<Intersection> = scene
        .meshes()
        .iter()
        .filter(|mesh| registry.shape_for(mesh.handle).is_some())
        .filter_map(|mesh| intersect_mesh(ray, mesh))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Shape record under a screen point, or `None` when the click hits nothing.
///
/// `screen_x`/`screen_y` are in the same pixel space as `viewport`.
pub fn resolve_click<'a>(
    screen_x: f32,
    screen_y: f32,
    viewport: &Viewport,
    camera: &OrbitCamera,
    scene: &Scene,
    registry: &MeshRegistry,
    shapes: &'a [ShapeRecord],
) -> Option<&'a ShapeRecord> {
    let ndc = screen_to_ndc(Vec2::new(screen_x, screen_y), viewport)?;
    let ray = camera.ray_through_ndc(ndc);

    let nearest = intersect_scene(&ray, scene, registry).into_iter().next()?;
    let shape_id = registry.shape_for(nearest.handle)?;
    let record = shapes.iter().find(|s| s.id == shape_id)?;

    log::debug!(
        "Picked shape {} ({}) at distance {:.3} via {}",
        record.id,
        record.name,
        nearest.distance,
        nearest.handle
    );
    Some(record)
}

/// The currently highlighted shape name.
///
/// Set by a successful pick; a miss leaves it alone. Only `reset` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickState {
    highlighted: Option<String>,
}

impl PickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &PickEvent) {
        self.highlighted = Some(event.name.clone());
    }

    pub fn reset(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }
}
