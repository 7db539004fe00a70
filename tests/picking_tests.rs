use glam::{Vec2, Vec3};
use shape_viewer::camera::OrbitCamera;
use shape_viewer::core::Viewport;
use shape_viewer::layout::camera_framing;
use shape_viewer::picking::{resolve_click, PickEvent, PickState};
use shape_viewer::scene::{Scene, SceneSync};
use shape_viewer::ShapeRecord;

struct Fixture {
    shapes: Vec<ShapeRecord>,
    scene: Scene,
    sync: SceneSync,
    camera: OrbitCamera,
    viewport: Viewport,
}

impl Fixture {
    fn new(shapes: Vec<ShapeRecord>) -> Self {
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&shapes));

        let viewport = Viewport::from_size(800, 600);
        let mut camera = OrbitCamera::new(viewport.aspect());
        if let Some(framing) = camera_framing(shapes.len()) {
            camera.frame(&framing);
        }

        Self {
            shapes,
            scene,
            sync,
            camera,
            viewport,
        }
    }

    /// Screen position where a world point appears
    fn screen_of(&self, world: Vec3) -> Vec2 {
        let ndc = self.camera.world_to_ndc(world).unwrap();
        self.viewport.from_ndc(ndc.truncate())
    }

    fn click(&self, screen: Vec2) -> Option<&ShapeRecord> {
        resolve_click(
            screen.x,
            screen.y,
            &self.viewport,
            &self.camera,
            &self.scene,
            self.sync.registry(),
            &self.shapes,
        )
    }
}

fn sphere_and_cube() -> Vec<ShapeRecord> {
    vec![
        ShapeRecord::new(1, "Ball", "Sphere"),
        ShapeRecord::new(2, "Box", "Cube"),
    ]
}

#[cfg(test)]
mod picking_tests {
    use super::*;

    #[test]
    fn test_click_on_cube_resolves_cube() {
        let fixture = Fixture::new(sphere_and_cube());
        // Two shapes: sphere at (2, 0, 0), cube at (-2, 0, 0)
        let screen = fixture.screen_of(Vec3::new(-2.0, 0.1, 0.2));
        let picked = fixture.click(screen).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(picked.name, "Box");
    }

    #[test]
    fn test_click_on_sphere_resolves_sphere() {
        let fixture = Fixture::new(sphere_and_cube());
        let screen = fixture.screen_of(Vec3::new(2.0, 0.3, 0.1));
        assert_eq!(fixture.click(screen).map(|s| s.id), Some(1));
    }

    #[test]
    fn test_empty_space_leaves_selection_alone() {
        let fixture = Fixture::new(sphere_and_cube());
        let mut state = PickState::new();

        let hit = fixture.click(fixture.screen_of(Vec3::new(-2.0, 0.1, 0.2))).unwrap();
        state.apply(&PickEvent::from(hit));
        assert_eq!(state.highlighted(), Some("Box"));

        // The ring center is empty
        let miss = fixture.click(Vec2::new(400.0, 300.0));
        assert!(miss.is_none());
        if let Some(record) = miss {
            state.apply(&PickEvent::from(record));
        }
        assert_eq!(state.highlighted(), Some("Box"));

        let corner = fixture.click(Vec2::new(2.0, 2.0));
        assert!(corner.is_none());
    }

    #[test]
    fn test_unrenderable_shape_is_never_picked() {
        let shapes = vec![
            ShapeRecord::new(1, "Ball", "Sphere"),
            ShapeRecord::new(2, "Tomb", "Pyramid"),
            ShapeRecord::new(3, "Box", "Cube"),
        ];
        let fixture = Fixture::new(shapes);
        assert!(!fixture.sync.registry().contains_shape(2));

        // Slot 1 of 3 is where the pyramid would have been
        let empty_slot = shape_viewer::layout::ring_position(1, 3).unwrap();
        assert!(fixture.click(fixture.screen_of(empty_slot)).is_none());

        let cube = shape_viewer::layout::ring_position(2, 3).unwrap();
        assert_eq!(fixture.click(fixture.screen_of(cube)).map(|s| s.id), Some(3));
    }

    #[test]
    fn test_offset_viewport() {
        let mut fixture = Fixture::new(sphere_and_cube());
        fixture.viewport = Viewport::new(200.0, 100.0, 800.0, 600.0);
        let screen = fixture.screen_of(Vec3::new(-2.0, 0.1, 0.2));
        assert!(screen.x > 200.0);
        assert_eq!(fixture.click(screen).map(|s| s.id), Some(2));
    }

    #[test]
    fn test_nearest_mesh_wins() {
        // Camera on the +X axis looks through the sphere at the cube behind it
        let mut fixture = Fixture::new(sphere_and_cube());
        fixture.camera.position = Vec3::new(10.0, 0.05, 0.02);
        fixture.camera.target = Vec3::new(0.0, 0.05, 0.02);
        let picked = fixture.click(Vec2::new(400.0, 300.0)).unwrap();
        assert_eq!(picked.id, 1);
    }
}
