use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::Geometry;
use crate::math::AABB;

/// Indexed triangle mesh in local space
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub bounds: AABB,
}

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let mut builder = Builder::default();
        match *geometry {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => builder.sphere(radius, width_segments.max(3), height_segments.max(2)),
            Geometry::Box {
                width,
                height,
                depth,
            } => builder.cuboid(Vec3::new(width, height, depth) * 0.5),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => builder.cylinder(radius_top, radius_bottom, height, radial_segments.max(3)),
            Geometry::Cone {
                radius,
                height,
                radial_segments,
            } => builder.cylinder(0.0, radius, height, radial_segments.max(3)),
        }
        builder.finish()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of every triangle, offset by `translation`
    pub fn triangles(&self, translation: Vec3) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.positions[tri[0] as usize] + translation,
                self.positions[tri[1] as usize] + translation,
                self.positions[tri[2] as usize] + translation,
            ]
        })
    }
}

#[derive(Default)]
struct Builder {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Builder {
    fn vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn sphere(&mut self, radius: f32, width_segments: u32, height_segments: u32) {
        let mut grid = Vec::with_capacity(height_segments as usize + 1);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let row: Vec<u32> = (0..=width_segments)
                .map(|ix| {
                    let u = ix as f32 / width_segments as f32;
                    let normal = Vec3::new(
                        -(u * TAU).cos() * (v * PI).sin(),
                        (v * PI).cos(),
                        (u * TAU).sin() * (v * PI).sin(),
                    );
                    self.vertex(normal * radius, normal)
                })
                .collect();
            grid.push(row);
        }

        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                // Pole rows collapse to a single point; skip their degenerate halves
                if iy != 0 {
                    self.triangle(a, b, d);
                }
                if iy != height_segments as usize - 1 {
                    self.triangle(b, c, d);
                }
            }
        }
    }

    fn cuboid(&mut self, half: Vec3) {
        // (normal, u, v) with u x v == normal so quads wind counter-clockwise
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        for (normal, u, v) in faces {
            let center = normal * half;
            let u = u * half;
            let v = v * half;
            let p0 = self.vertex(center - u - v, normal);
            let p1 = self.vertex(center + u - v, normal);
            let p2 = self.vertex(center + u + v, normal);
            let p3 = self.vertex(center - u + v, normal);
            self.triangle(p0, p1, p2);
            self.triangle(p0, p2, p3);
        }
    }

    fn cylinder(&mut self, radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) {
        let half_height = height * 0.5;
        let slope = (radius_bottom - radius_top) / height;

        // Side wall: row 0 at the top, row 1 at the bottom
        let rows: Vec<Vec<u32>> = [(radius_top, half_height), (radius_bottom, -half_height)]
            .into_iter()
            .map(|(radius, y)| {
                (0..=radial_segments)
                    .map(|x| {
                        let theta = x as f32 / radial_segments as f32 * TAU;
                        let (sin, cos) = theta.sin_cos();
                        let normal = Vec3::new(sin, slope, cos).normalize();
                        self.vertex(Vec3::new(radius * sin, y, radius * cos), normal)
                    })
                    .collect()
            })
            .collect();

        for x in 0..radial_segments as usize {
            let a = rows[0][x];
            let b = rows[1][x];
            let c = rows[1][x + 1];
            let d = rows[0][x + 1];
            if radius_top > 0.0 {
                self.triangle(a, b, d);
            }
            if radius_bottom > 0.0 {
                self.triangle(b, c, d);
            }
        }

        if radius_top > 0.0 {
            self.cap(radius_top, half_height, radial_segments, true);
        }
        if radius_bottom > 0.0 {
            self.cap(radius_bottom, -half_height, radial_segments, false);
        }
    }

    fn cap(&mut self, radius: f32, y: f32, radial_segments: u32, top: bool) {
        let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
        let center = self.vertex(Vec3::new(0.0, y, 0.0), normal);
        let ring: Vec<u32> = (0..=radial_segments)
            .map(|x| {
                let theta = x as f32 / radial_segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                self.vertex(Vec3::new(radius * sin, y, radius * cos), normal)
            })
            .collect();

        for pair in ring.windows(2) {
            if top {
                self.triangle(pair[0], pair[1], center);
            } else {
                self.triangle(pair[1], pair[0], center);
            }
        }
    }

    fn finish(self) -> MeshData {
        let bounds = AABB::from_points(&self.positions)
            .unwrap_or_else(|| AABB::new(Vec3::ZERO, Vec3::ZERO));
        MeshData {
            positions: self.positions,
            normals: self.normals,
            indices: self.indices,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{resolve, MeshSpec};
    use crate::shape::ShapeKind;

    fn assert_outward_winding(mesh: &MeshData) {
        let center = mesh.bounds.center();
        for [a, b, c] in mesh.triangles(Vec3::ZERO) {
            let face_normal = (b - a).cross(c - a);
            if face_normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal.dot(centroid - center) > 0.0,
                "inward facing triangle at {centroid:?}"
            );
        }
    }

    #[test]
    fn test_sphere_bounds_and_normals() {
        let mesh = resolve("sphere").unwrap().tessellate();
        assert!((mesh.bounds.max - Vec3::splat(1.0)).abs().max_element() < 0.01);
        assert!((mesh.bounds.min + Vec3::splat(1.0)).abs().max_element() < 0.01);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((p.length() - 1.0).abs() < 1e-4);
            assert!((*n - *p).length() < 1e-4);
        }
        assert_eq!(mesh.triangle_count(), 2 * 32 * 31);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_cube_is_unit() {
        let mesh = MeshSpec::for_kind(ShapeKind::Cube).tessellate();
        assert_eq!(mesh.bounds, AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_cylinder_dimensions() {
        let mesh = MeshSpec::for_kind(ShapeKind::Cylinder).tessellate();
        assert!((mesh.bounds.min.y + 1.0).abs() < 1e-6);
        assert!((mesh.bounds.max.y - 1.0).abs() < 1e-6);
        assert!((mesh.bounds.max.x - 1.0).abs() < 1e-3);
        // 32 side quads plus two 32-triangle caps
        assert_eq!(mesh.triangle_count(), 32 * 2 + 32 * 2);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_cone_apex_on_top() {
        let mesh = MeshSpec::for_kind(ShapeKind::Cone).tessellate();
        assert!((mesh.bounds.max.y - 1.0).abs() < 1e-6);
        let top: Vec<_> = mesh.positions.iter().filter(|p| (p.y - 1.0).abs() < 1e-6).collect();
        assert!(top.iter().all(|p| p.x.abs() < 1e-6 && p.z.abs() < 1e-6));
        // No top cap: 32 side triangles plus a 32-triangle base
        assert_eq!(mesh.triangle_count(), 32 + 32);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn test_translated_triangles() {
        let mesh = MeshSpec::for_kind(ShapeKind::Cube).tessellate();
        let offset = Vec3::new(4.0, 0.0, 0.0);
        for tri in mesh.triangles(offset) {
            for p in tri {
                assert!(p.x >= 3.5 - 1e-6 && p.x <= 4.5 + 1e-6);
            }
        }
    }
}
