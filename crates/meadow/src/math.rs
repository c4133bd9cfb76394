//! Screen-space rectangles and the pixel projection.
//!
//! Everything the engine draws is an axis-aligned rectangle in window
//! pixels with the origin at the top-left corner and Y growing downwards.

pub use glam::{Mat4, Vec2, Vec3};

/// An axis-aligned rectangle in pixels. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Corners in draw order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.w, self.y),
            Vec2::new(self.x + self.w, self.y + self.h),
            Vec2::new(self.x, self.y + self.h),
        ]
    }

    /// Resize to `w` x `h` keeping the center where it is.
    pub fn resize_centered(&mut self, w: f32, h: f32) {
        self.x -= (w - self.w) * 0.5;
        self.y -= (h - self.h) * 0.5;
        self.w = w;
        self.h = h;
    }
}

/// Orthographic projection mapping viewport pixels (top-left origin) to clip
/// space.
pub fn pixel_projection(viewport: (u32, u32)) -> Mat4 {
    let w = viewport.0.max(1) as f32;
    let h = viewport.1.max(1) as f32;
    Mat4::orthographic_rh(0.0, w, h, 0.0, -1.0, 1.0)
}
