//! Axis-aligned rectangles and intersection-over-union.

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width; zero or negative width gives an empty rectangle.
    pub width: f32,
    /// Height; zero or negative height gives an empty rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    pub fn min_x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    pub fn min_y(&self) -> f32 {
        self.y
    }

    /// Right edge, `x + width`.
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Returns `width * height`; negative when exactly one side is negative.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Computes intersection-over-union of two rectangles.
///
/// Returns 0 when either rectangle has non-positive area, so degenerate
/// boxes never suppress or get suppressed.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let area_a = a.area();
    if area_a <= 0.0 {
        return 0.0;
    }
    let area_b = b.area();
    if area_b <= 0.0 {
        return 0.0;
    }

    let inter_w = (a.max_x().min(b.max_x()) - a.min_x().max(b.min_x())).max(0.0);
    let inter_h = (a.max_y().min(b.max_y()) - a.min_y().max(b.min_y())).max(0.0);
    let inter = inter_w * inter_h;
    inter / (area_a + area_b - inter)
}

#[cfg(test)]
mod tests {
    use super::{iou, Rect};

    #[test]
    fn identical_rects_have_unit_iou() {
        let r = Rect::new(3.0, 4.0, 10.0, 5.0);
        assert!((iou(&r, &r) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn disjoint_and_touching_rects_have_zero_iou() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&a, &Rect::new(20.0, 20.0, 5.0, 5.0)), 0.0);
        assert_eq!(iou(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)), 0.0);
    }

    #[test]
    fn degenerate_rects_have_zero_iou() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(iou(&a, &flat), 0.0);
        assert_eq!(iou(&flat, &a), 0.0);
        assert_eq!(iou(&flat, &flat), 0.0);
        assert_eq!(iou(&a, &Rect::new(0.0, 0.0, -5.0, 5.0)), 0.0);
    }

    #[test]
    fn partial_overlap_matches_hand_computation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 0.0, 10.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
        assert!((iou(&a, &b) - iou(&b, &a)).abs() < 1e-6);
    }
}
