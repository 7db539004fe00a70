use glam::Vec3;

/// Result of a ray/triangle test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    pub t: f32, // Distance along ray
    pub u: f32,
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection, double sided
pub fn moller_trumbore_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    // Parallel or degenerate
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}
