use serde::{Serialize, Deserialize};

/// Corner coordinates of a detection in the pixel space of the frame it was found in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Integer corners clamped to a `width` x `height` frame, ordered so that the
    /// first corner is the top-left one.
    pub fn clamp_to(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let max_x = width.saturating_sub(1) as f32;
        let max_y = height.saturating_sub(1) as f32;
        let clamp = |value: f32, max: f32| value.max(0_f32).min(max) as u32;
        let (left, right) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (top, bottom) = (self.y1.min(self.y2), self.y1.max(self.y2));
        (clamp(left, max_x), clamp(top, max_y), clamp(right, max_x), clamp(bottom, max_y))
    }
}
