//! Ring layout: shapes sit on a horizontal circle around the origin, placed
//! purely by their index in the input sequence and the sequence length.

use std::f32::consts::TAU;

use glam::Vec3;

pub const MIN_RING_RADIUS: f32 = 2.0;
pub const RING_RADIUS_PER_SHAPE: f32 = 0.5;
pub const MIN_CAMERA_DISTANCE: f32 = 5.0;
pub const CAMERA_DISTANCE_PER_SHAPE: f32 = 1.5;

/// Where the camera sits after a rebuild
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFraming {
    pub distance: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

pub fn ring_radius(count: usize) -> f32 {
    (count as f32 * RING_RADIUS_PER_SHAPE).max(MIN_RING_RADIUS)
}

pub fn ring_angle(index: usize, count: usize) -> f32 {
    index as f32 / count as f32 * TAU
}

/// Position of slot `index` in a ring of `count` slots.
///
/// Returns `None` for an empty ring or an out-of-range index.
pub fn ring_position(index: usize, count: usize) -> Option<Vec3> {
    if index >= count {
        return None;
    }
    let angle = ring_angle(index, count);
    let radius = ring_radius(count);
    Some(Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius))
}

/// Camera framing for `count` shapes, `None` when there is nothing to frame
pub fn camera_framing(count: usize) -> Option<CameraFraming> {
    if count == 0 {
        return None;
    }
    let distance = (count as f32 * CAMERA_DISTANCE_PER_SHAPE).max(MIN_CAMERA_DISTANCE);
    Some(CameraFraming {
        distance,
        eye: Vec3::new(0.0, distance, distance),
        target: Vec3::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shape_on_radius_floor() {
        assert_eq!(ring_position(0, 1), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_empty_ring_has_no_positions() {
        assert_eq!(ring_position(0, 0), None);
        assert_eq!(camera_framing(0), None);
    }

    #[test]
    fn test_index_out_of_range() {
        assert_eq!(ring_position(3, 3), None);
    }

    #[test]
    fn test_radius_grows_past_four_shapes() {
        assert_eq!(ring_radius(1), 2.0);
        assert_eq!(ring_radius(4), 2.0);
        assert_eq!(ring_radius(5), 2.5);
        assert_eq!(ring_radius(10), 5.0);
    }

    #[test]
    fn test_positions_lie_on_circle() {
        for count in 1..=24 {
            let radius = ring_radius(count);
            for index in 0..count {
                let p = ring_position(index, count).unwrap();
                assert_eq!(p.y, 0.0);
                let r = (p.x * p.x + p.z * p.z).sqrt();
                assert!((r - radius).abs() < 1e-4, "count {count} index {index}: {r}");
                let angle = index as f32 / count as f32 * TAU;
                assert!((p.x - angle.cos() * radius).abs() < 1e-5);
                assert!((p.z - angle.sin() * radius).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_two_shapes_opposite() {
        let a = ring_position(0, 2).unwrap();
        let b = ring_position(1, 2).unwrap();
        assert!((a - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((b - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera_framing_ten_shapes() {
        let framing = camera_framing(10).unwrap();
        assert_eq!(framing.distance, 15.0);
        assert_eq!(framing.eye, Vec3::new(0.0, 15.0, 15.0));
        assert_eq!(framing.target, Vec3::ZERO);
    }

    #[test]
    fn test_camera_framing_floor() {
        assert_eq!(camera_framing(1).unwrap().distance, 5.0);
        assert_eq!(camera_framing(3).unwrap().distance, 5.0);
        assert_eq!(camera_framing(4).unwrap().distance, 6.0);
    }
}
