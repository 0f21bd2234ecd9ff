use super::Vec2;

/// Axis-aligned rectangle in target pixels (top-left origin).
///
/// Width and height may be negative when a script passes a flipped source
/// rectangle; use [`normalized`](Self::normalized) where geometry needs a
/// positive extent.
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

    #[inline]
    pub fn from_i32(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x as f32, y as f32, w as f32, h as f32)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    /// Returns the same area with non-negative width/height.
    #[inline]
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let lo = Vec2::new(a.origin.x.max(b.origin.x), a.origin.y.max(b.origin.y));
        let hi = Vec2::new(a.max().x.min(b.max().x), a.max().y.min(b.max().y));

        if hi.x <= lo.x || hi.y <= lo.y {
            None
        } else {
            Some(Rect::new(lo.x, lo.y, hi.x - lo.x, hi.y - lo.y))
        }
    }

    /// Corners of `self` placed as a destination quad: the quad is translated so
    /// that `origin` (relative to the rect's top-left) sits on `self.origin`,
    /// then rotated around that point by `degrees`.
    ///
    /// Order: top-left, top-right, bottom-right, bottom-left.
    pub fn pivoted_corners(self, origin: Vec2, degrees: f32) -> [Vec2; 4] {
        let local = [
            Vec2::new(0.0, 0.0),
            Vec2::new(self.size.x, 0.0),
            Vec2::new(self.size.x, self.size.y),
            Vec2::new(0.0, self.size.y),
        ];
        local.map(|p| self.origin + (p - origin).rotated(degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_keeps_positive_rects() {
        assert_eq!(r(1.0, 2.0, 3.0, 4.0).normalized(), r(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn normalized_flips_negative_extent() {
        assert_eq!(r(10.0, 10.0, -4.0, -6.0).normalized(), r(6.0, 4.0, 4.0, 6.0));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlap() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 10.0, 10.0));
        assert_eq!(i, Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn intersect_shared_edge_is_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 5.0, 5.0)).is_none());
    }

    // ── pivoted_corners ───────────────────────────────────────────────────

    #[test]
    fn pivot_without_rotation_offsets_by_origin() {
        let c = r(100.0, 50.0, 20.0, 10.0).pivoted_corners(Vec2::new(10.0, 5.0), 0.0);
        assert_eq!(c[0], Vec2::new(90.0, 45.0));
        assert_eq!(c[2], Vec2::new(110.0, 55.0));
    }

    #[test]
    fn pivot_rotation_keeps_pivot_fixed() {
        // Rotating around the top-left corner keeps that corner in place.
        let c = r(30.0, 30.0, 8.0, 8.0).pivoted_corners(Vec2::zero(), 45.0);
        assert_eq!(c[0], Vec2::new(30.0, 30.0));
    }
}
