//! Axis-aligned rectangles in screen pixels (y grows downward).

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self { Rect { x, y, w, h } }

    pub fn right(&self)  -> f32 { self.x + self.w }
    pub fn bottom(&self) -> f32 { self.y + self.h }

    /// Grow (or, with negative deltas, shrink) about the centre.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        Rect {
            x: self.x - dw / 2.0,
            y: self.y - dh / 2.0,
            w: (self.w + dw).max(0.0),
            h: (self.h + dh).max(0.0),
        }
    }

    /// Strict overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
