/// Viewport rectangle in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Rectangle from position and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width over height, or `None` for a zero-height rectangle.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.height > 0.0).then(|| self.width / self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Snap to whole pixels so neighbouring columns share an edge. Returns
    /// `(x, y, width, height)`.
    #[must_use]
    pub fn to_pixels(&self) -> (u32, u32, u32, u32) {
        let x0 = self.x.round().max(0.0) as u32;
        let y0 = self.y.round().max(0.0) as u32;
        let x1 = self.right().round().max(0.0) as u32;
        let y1 = (self.y + self.height).round().max(0.0) as u32;
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Split a `width` x `height` window into `count` equal full-height
/// columns, left to right.
#[must_use]
pub fn equal_columns(width: u32, height: u32, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let column = width as f32 / count as f32;
    (0..count)
        .map(|i| Rect::new(i as f32 * column, 0.0, column, height as f32))
        .collect()
}
