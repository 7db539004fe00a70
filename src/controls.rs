use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::OrbitCamera;
use crate::error::{Result, ViewerError};

pub const DAMPING_FACTOR: f32 = 0.05;
pub const ROTATE_SPEED: f32 = 1.0;
pub const PAN_SPEED: f32 = 1.0;
/// Dolly scale per wheel line
pub const ZOOM_STEP: f32 = 0.95;
pub const MIN_DISTANCE: f32 = 0.5;
pub const MAX_DISTANCE: f32 = 500.0;

const POLE_EPSILON: f32 = 1e-6;
const SETTLE_EPSILON: f32 = 1e-6;

/// Orbit, zoom and pan around the camera target.
///
/// Pointer input accumulates deltas; [`OrbitControls::update`] applies a
/// damped share of them to the camera once per frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    attached: bool,
    damping: f32,
    /// (azimuth, polar) still to apply
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            attached: false,
            damping: DAMPING_FACTOR,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) -> Result<()> {
        if !self.attached {
            return Err(ViewerError::AlreadyReleased("orbit controls"));
        }
        self.reset();
        self.attached = false;
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Drop pending motion, e.g. after the camera was reframed
    pub fn reset(&mut self) {
        self.spherical_delta = Vec2::ZERO;
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    /// Drag by `delta` pixels in a viewport `viewport_height` pixels tall
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if !self.attached || viewport_height <= 0.0 {
            return;
        }
        self.spherical_delta.x -= TAU * delta.x / viewport_height * ROTATE_SPEED;
        self.spherical_delta.y -= TAU * delta.y / viewport_height * ROTATE_SPEED;
    }

    /// Screen-space pan so the target follows the pointer
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, camera: &OrbitCamera) {
        if !self.attached || viewport_height <= 0.0 {
            return;
        }
        let target_distance = camera.distance() * (camera.fov_y * 0.5).tan();
        let left = -camera.right() * (2.0 * delta.x * target_distance / viewport_height);
        let up = camera.camera_up() * (2.0 * delta.y * target_distance / viewport_height);
        self.pan_offset += (left + up) * PAN_SPEED;
    }

    /// Positive `lines` moves toward the target
    pub fn zoom(&mut self, lines: f32) {
        if !self.attached {
            return;
        }
        self.scale *= ZOOM_STEP.powf(lines);
    }

    pub fn is_settled(&self) -> bool {
        self.spherical_delta.abs().max_element() < SETTLE_EPSILON
            && self.pan_offset.abs().max_element() < SETTLE_EPSILON
            && (self.scale - 1.0).abs() < SETTLE_EPSILON
    }

    /// Move the camera by the damped share of pending input. Returns whether
    /// the camera moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        if self.is_settled() {
            self.reset();
            return false;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length().max(POLE_EPSILON);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };
        theta += self.spherical_delta.x * factor;
        phi = (phi + self.spherical_delta.y * factor).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius = (radius * self.scale).clamp(MIN_DISTANCE, MAX_DISTANCE);

        camera.target += self.pan_offset * factor;
        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        if self.damping > 0.0 {
            self.spherical_delta *= 1.0 - self.damping;
            self.pan_offset *= 1.0 - self.damping;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}
