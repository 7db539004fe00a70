use glam::{Mat4, Vec2, Vec3};

use crate::layout::CameraFraming;
use crate::math::Ray;

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _pad: f32,
}

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    /// Camera five units back on +Z, the framing before any shapes arrive
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    pub fn frame(&mut self, framing: &CameraFraming) {
        self.position = framing.eye;
        self.target = framing.target;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Camera-space up, orthogonal to forward and right
    pub fn camera_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.view_projection().inverse();
        // glam's perspective_rh maps depth to [0, 1]
        let near_point = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far_point = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far_point - near_point)
    }

    /// Project a world point into NDC; `None` when it sits behind the camera
    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            eye: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}
