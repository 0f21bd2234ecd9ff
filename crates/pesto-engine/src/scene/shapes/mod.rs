pub(crate) mod circle;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod poly;
pub(crate) mod rect;
pub(crate) mod text;

pub use circle::CircleCmd;
pub use image::ImageCmd;
pub use line::{LineCmd, PixelCmd};
pub use poly::PolyCmd;
pub use rect::RectCmd;
pub use text::TextCmd;

/// Whether a closed shape is filled or drawn as a 1 px outline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Style {
    #[default]
    Fill,
    Outline,
}

impl Style {
    #[inline]
    pub fn filled(filled: bool) -> Self {
        if filled { Style::Fill } else { Style::Outline }
    }
}

/// Width of outlines and lines, in target pixels.
pub const LINE_WIDTH: f32 = 1.0;

/// Upper bound on polygon sides and circle segments.
pub const MAX_SIDES: u32 = 256;
