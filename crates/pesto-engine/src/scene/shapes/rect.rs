use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

use super::Style;

/// Rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub style: Style,
    pub color: Color,
}

impl RectCmd {
    #[inline]
    pub fn new(rect: Rect, style: Style, color: Color) -> Self {
        Self { rect, style, color }
    }
}

impl DrawList {
    /// Records a rectangle draw command.
    #[inline]
    pub fn push_rect(&mut self, rect: Rect, style: Style, color: Color) {
        self.push(DrawCmd::Rect(RectCmd::new(rect, style, color)));
    }

    /// Records a filled rectangle.
    #[inline]
    pub fn push_solid_rect(&mut self, rect: Rect, color: Color) {
        self.push_rect(rect, Style::Fill, color);
    }
}
