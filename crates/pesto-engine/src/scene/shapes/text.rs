use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontId;

/// Text draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Font size in target pixels.
    pub size: f32,
    /// Extra advance between glyphs, in target pixels.
    pub spacing: f32,
    pub color: Color,
    /// Top-left of the text block.
    pub origin: Vec2,
    /// Wrapping width. `None` = single run, only explicit newlines break.
    pub max_width: Option<f32>,
}

impl DrawList {
    /// Records a text draw command.
    #[allow(clippy::too_many_arguments)]
    pub fn push_text(
        &mut self,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        spacing: f32,
        color: Color,
        origin: Vec2,
        max_width: Option<f32>,
    ) {
        self.push(DrawCmd::Text(TextCmd {
            text: text.into(),
            font,
            size,
            spacing,
            color,
            origin,
            max_width,
        }));
    }

    /// Records text wrapped to `bounds.size.x` and clipped to `bounds`.
    pub fn push_wrapped_text(
        &mut self,
        text: impl Into<String>,
        font: FontId,
        size: f32,
        color: Color,
        bounds: Rect,
    ) {
        let bounds = bounds.normalized();
        self.push_clip(bounds);
        self.push_text(text, font, size, 0.0, color, bounds.origin, Some(bounds.size.x));
        self.pop_clip();
    }
}
