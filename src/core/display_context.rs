use glam::Vec2;

/// Drawing region in physical pixels, relative to the window origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Viewport covering a whole `width` x `height` surface
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }

    /// Map a screen point to normalized device coordinates, y up
    pub fn to_ndc(&self, point: Vec2) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        Some(Vec2::new(
            (point.x - self.left) / self.width * 2.0 - 1.0,
            -(point.y - self.top) / self.height * 2.0 + 1.0,
        ))
    }

    /// Inverse of [`Viewport::to_ndc`]
    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.left + (ndc.x + 1.0) * 0.5 * self.width,
            self.top + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}
