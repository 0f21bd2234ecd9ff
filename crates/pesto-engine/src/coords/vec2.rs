use core::ops::{Add, Mul, Neg, Sub};

/// 2D vector in target pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Integer pixel position, as scripts pass them.
    #[inline]
    pub fn from_i32(x: i32, y: i32) -> Self {
        Self::new(x as f32, y as f32)
    }

    /// Rotates the vector around the origin by `degrees` (clockwise on screen,
    /// since +Y points down).
    #[inline]
    pub fn rotated(self, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn rotate_zero_is_identity() {
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(v.rotated(0.0), v);
    }

    #[test]
    fn rotate_quarter_turn_points_down() {
        // +X rotated by 90° lands on +Y, which is "down" in screen space.
        assert!(close(Vec2::new(1.0, 0.0).rotated(90.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn rotate_preserves_length() {
        let v = Vec2::new(4.0, 3.0);
        assert!((v.rotated(37.0).length() - 5.0).abs() < 1e-4);
    }
}
