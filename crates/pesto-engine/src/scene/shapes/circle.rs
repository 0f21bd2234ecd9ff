use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::Style;

/// Circle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub style: Style,
    pub color: Color,
}

impl CircleCmd {
    #[inline]
    pub fn new(center: Vec2, radius: f32, style: Style, color: Color) -> Self {
        Self { center, radius, style, color }
    }
}

impl DrawList {
    /// Records a circle draw command.
    #[inline]
    pub fn push_circle(&mut self, center: Vec2, radius: f32, style: Style, color: Color) {
        self.push(DrawCmd::Circle(CircleCmd::new(center, radius, style, color)));
    }
}
