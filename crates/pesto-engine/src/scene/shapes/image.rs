use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::resources::Texture;
use crate::scene::{DrawCmd, DrawList};

/// Textured quad payload.
///
/// `src` is in texel space of `texture`; a negative width or height mirrors the
/// sampled region. `dst.origin` is where `origin` (relative to the destination
/// quad's top-left) lands, and the quad rotates around that point.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub texture: Texture,
    pub src: Rect,
    pub dst: Rect,
    pub origin: Vec2,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
    pub tint: Color,
}

impl DrawList {
    /// Records `texture` at `pos`, unscaled.
    pub fn push_image(&mut self, texture: Texture, pos: Vec2, tint: Color) {
        let (w, h) = (texture.width as f32, texture.height as f32);
        self.push_image_pro(
            texture,
            Rect::new(0.0, 0.0, w, h),
            Rect::new(pos.x, pos.y, w, h),
            Vec2::zero(),
            0.0,
            tint,
        );
    }

    /// Records a region of `texture` stretched into `dst`.
    ///
    /// Textures without GPU storage (failed loads) are skipped.
    pub fn push_image_pro(
        &mut self,
        texture: Texture,
        src: Rect,
        dst: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        if texture.id.is_null() {
            return;
        }
        self.push(DrawCmd::Image(ImageCmd { texture, src, dst, origin, rotation, tint }));
    }
}
