//! Maps shape types to drawable geometry and a fixed material color.

mod tessellate;

pub use tessellate::MeshData;

use crate::math::hex_to_rgb;
use crate::shape::ShapeKind;

pub const SPHERE_COLOR: u32 = 0x8b0000;
pub const CUBE_COLOR: u32 = 0x00ff00;
pub const CYLINDER_COLOR: u32 = 0x0000ff;
pub const CONE_COLOR: u32 = 0x800080;

/// Parametric geometry, centered on its local origin with Y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
}

/// Everything needed to instantiate one mesh: geometry plus flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSpec {
    pub kind: ShapeKind,
    pub geometry: Geometry,
    /// `0xRRGGBB`
    pub color: u32,
}

impl MeshSpec {
    pub fn for_kind(kind: ShapeKind) -> Self {
        let (geometry, color) = match kind {
            ShapeKind::Sphere => (
                Geometry::Sphere {
                    radius: 1.0,
                    width_segments: 32,
                    height_segments: 32,
                },
                SPHERE_COLOR,
            ),
            ShapeKind::Cube => (
                Geometry::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                CUBE_COLOR,
            ),
            ShapeKind::Cylinder => (
                Geometry::Cylinder {
                    radius_top: 1.0,
                    radius_bottom: 1.0,
                    height: 2.0,
                    radial_segments: 32,
                },
                CYLINDER_COLOR,
            ),
            ShapeKind::Cone => (
                Geometry::Cone {
                    radius: 1.0,
                    height: 2.0,
                    radial_segments: 32,
                },
                CONE_COLOR,
            ),
        };
        Self {
            kind,
            geometry,
            color,
        }
    }

    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }

    pub fn tessellate(&self) -> MeshData {
        MeshData::from_geometry(&self.geometry)
    }
}

/// Resolve a raw type string; `None` means the shape is not drawn
pub fn resolve(shape_type: &str) -> Option<MeshSpec> {
    shape_type.parse::<ShapeKind>().ok().map(MeshSpec::for_kind)
}
