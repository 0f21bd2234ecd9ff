use crate::paint::Color;
use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::image::ImageCmd;
use crate::scene::shapes::line::{LineCmd, PixelCmd};
use crate::scene::shapes::poly::PolyCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::text::TextCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - teach `render::geometry` how to tessellate it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fills the whole active target. Splits the pass when it is not the first command.
    Clear(Color),
    Pixel(PixelCmd),
    Line(LineCmd),
    Circle(CircleCmd),
    Rect(RectCmd),
    Poly(PolyCmd),
    Text(TextCmd),
    Image(ImageCmd),
}

impl DrawCmd {
    /// The color used to fill the active target, for `Clear` commands.
    #[inline]
    pub fn clear_color(&self) -> Option<Color> {
        match self {
            DrawCmd::Clear(c) => Some(*c),
            _ => None,
        }
    }
}
