use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
///
/// Also used for the fragment boxes of an element: an inline element that
/// wraps over three lines reports three rects.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Vertical extent; a negative size still reports a positive height.
    #[inline]
    pub fn height(self) -> f32 {
        self.size.y.abs()
    }
}
