/// Size of the surface a pass draws into.
///
/// For the window this is the logical size; for render textures it is the
/// texture size in pixels. Batching divides by it to reach NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a pixel position to normalized device coordinates.
    #[inline]
    pub fn to_ndc(self, x: f32, y: f32) -> [f32; 2] {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        [x / w * 2.0 - 1.0, 1.0 - y / h * 2.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(200.0, 100.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(vp.to_ndc(200.0, 100.0), [1.0, -1.0]);
        assert_eq!(vp.to_ndc(100.0, 50.0), [0.0, 0.0]);
    }

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::from_pixels(1, 1).is_valid());
    }
}
