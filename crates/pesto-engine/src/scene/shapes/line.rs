use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Single pixel payload. `pos` is the pixel's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCmd {
    pub pos: Vec2,
    pub color: Color,
}

/// 1 px line segment payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

impl DrawList {
    #[inline]
    pub fn push_pixel(&mut self, pos: Vec2, color: Color) {
        self.push(DrawCmd::Pixel(PixelCmd { pos, color }));
    }

    #[inline]
    pub fn push_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.push(DrawCmd::Line(LineCmd { from, to, color }));
    }
}
