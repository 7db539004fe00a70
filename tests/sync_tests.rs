use std::collections::HashSet;

use shape_viewer::layout::{camera_framing, ring_position};
use shape_viewer::scene::{HandleAllocator, MeshRegistry, Scene, SceneCommand, SceneSync, plan_sync};
use shape_viewer::ShapeRecord;

fn shapes() -> Vec<ShapeRecord> {
    vec![
        ShapeRecord::new(1, "Ball", "Sphere"),
        ShapeRecord::new(2, "Box", "Cube"),
        ShapeRecord::new(3, "Pipe", "Cylinder"),
        ShapeRecord::new(4, "Hat", "Cone"),
    ]
}

fn framings(commands: &[SceneCommand]) -> Vec<SceneCommand> {
    commands
        .iter()
        .filter(|c| matches!(c, SceneCommand::FrameCamera(_)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod sync_tests {
    use super::*;

    #[test]
    fn test_every_renderable_shape_is_registered() {
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&shapes()));

        assert_eq!(sync.registry().len(), 4);
        assert_eq!(scene.len(), 4);
        for shape in shapes() {
            let handle = sync.registry().mesh_for(shape.id).unwrap();
            assert_eq!(sync.registry().shape_for(handle), Some(shape.id));
            assert_eq!(scene.mesh(handle).unwrap().shape_id, shape.id);
        }
    }

    #[test]
    fn test_empty_input_clears_scene() {
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&shapes()));
        let framing = scene.framing();

        let commands = sync.sync(&[]);
        assert!(commands.iter().all(|c| matches!(c, SceneCommand::Remove(_))));
        assert_eq!(commands.len(), 4);
        scene.apply_all(&commands);

        assert!(sync.registry().is_empty());
        assert!(scene.is_empty());
        // No framing change for an empty list
        assert_eq!(scene.framing(), framing);
    }

    #[test]
    fn test_resync_is_idempotent() {
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();

        let first = sync.sync(&shapes());
        scene.apply_all(&first);
        let first_ids: HashSet<u64> = sync.registry().shape_ids().collect();
        let first_handles: HashSet<_> = sync.registry().handles().collect();
        let first_positions: Vec<_> = scene.meshes().iter().map(|m| (m.shape_id, m.position)).collect();

        let second = sync.sync(&shapes());
        scene.apply_all(&second);
        let second_ids: HashSet<u64> = sync.registry().shape_ids().collect();
        let second_handles: HashSet<_> = sync.registry().handles().collect();
        let second_positions: Vec<_> = scene.meshes().iter().map(|m| (m.shape_id, m.position)).collect();

        assert_eq!(first_ids, second_ids);
        assert!(first_handles.is_disjoint(&second_handles));
        assert_eq!(first_positions, second_positions);
        assert_eq!(framings(&first), framings(&second));
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn test_unrenderable_shape_keeps_its_slot() {
        let input = vec![
            ShapeRecord::new(1, "Ball", "Sphere"),
            ShapeRecord::new(2, "Tomb", "Pyramid"),
            ShapeRecord::new(3, "Box", "Cube"),
        ];
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&input));

        assert!(!sync.registry().contains_shape(2));
        assert_eq!(sync.registry().len(), 2);
        assert_eq!(scene.len(), 2);

        let cube = scene
            .mesh(sync.registry().mesh_for(3).unwrap())
            .unwrap();
        assert_eq!(Some(cube.position), ring_position(2, 3));
        // Framing still counts the skipped record
        assert_eq!(scene.framing(), camera_framing(3));
    }

    #[test]
    fn test_missing_type_is_skipped() {
        let input: Vec<ShapeRecord> =
            serde_json::from_str(r#"[{"id": 7, "name": "Nameless"}, {"id": 8, "name": "Ball", "type": "sphere"}]"#)
                .unwrap();
        let mut sync = SceneSync::new();
        sync.sync(&input);
        assert!(!sync.registry().contains_shape(7));
        assert!(sync.registry().contains_shape(8));
    }

    #[test]
    fn test_duplicate_ids_first_wins() {
        let input = vec![
            ShapeRecord::new(5, "First", "Sphere"),
            ShapeRecord::new(5, "Second", "Cube"),
        ];
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&input));

        assert_eq!(sync.registry().len(), 1);
        let mesh = scene.mesh(sync.registry().mesh_for(5).unwrap()).unwrap();
        assert_eq!(Some(mesh.position), ring_position(0, 2));
    }

    #[test]
    fn test_plan_removes_then_adds_then_frames() {
        let mut handles = HandleAllocator::new();
        let first = plan_sync(&MeshRegistry::new(), &shapes(), &mut handles);
        let second = plan_sync(&first.registry, &shapes()[..2], &mut handles);

        let kinds: Vec<&str> = second
            .commands
            .iter()
            .map(|c| match c {
                SceneCommand::Remove(_) => "remove",
                SceneCommand::Add(_) => "add",
                SceneCommand::FrameCamera(_) => "frame",
            })
            .collect();
        assert_eq!(kinds, ["remove", "remove", "remove", "remove", "add", "add", "frame"]);

        let removed: HashSet<_> = second
            .commands
            .iter()
            .filter_map(|c| match c {
                SceneCommand::Remove(handle) => Some(*handle),
                _ => None,
            })
            .collect();
        let previous: HashSet<_> = first.registry.handles().collect();
        assert_eq!(removed, previous);
    }

    #[test]
    fn test_geometry_is_shared_per_kind() {
        let input = vec![
            ShapeRecord::new(1, "A", "Cube"),
            ShapeRecord::new(2, "B", "cube"),
        ];
        let mut sync = SceneSync::new();
        let mut scene = Scene::new();
        scene.apply_all(&sync.sync(&input));

        let meshes = scene.meshes();
        assert!(std::sync::Arc::ptr_eq(&meshes[0].data, &meshes[1].data));
    }
}
