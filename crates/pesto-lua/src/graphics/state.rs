use pesto_engine::coords::{Rect, Vec2};
use pesto_engine::paint::Color;
use pesto_engine::resources::{RenderTexture, Texture};
use pesto_engine::scene::{DrawCmd, DrawList, Style};
use pesto_engine::text::Font;

use crate::error::DrawError;

/// Whether a `beginDrawing`/`endDrawing` frame is open.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Pass {
    #[default]
    Outside,
    Inside,
}

/// Ambient state shared by every `pesto.graphics` function.
///
/// Commands are legal inside a frame or while a render texture is active.
/// A frame's list goes to the host at `endDrawing`; offscreen work recorded
/// outside a frame goes when the last texture mode ends.
#[derive(Debug, Default)]
pub struct DrawState {
    color: Color,
    font: Option<Font>,
    targets: Vec<RenderTexture>,
    pass: Pass,
    list: DrawList,
    warned_no_font: bool,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial state: white, no targets, outside a frame, nothing
    /// recorded. The font is supplied by the host and survives; the missing
    /// font warning is armed again.
    pub fn reset(&mut self) {
        self.color = Color::WHITE;
        self.targets.clear();
        self.pass = Pass::Outside;
        self.list.clear();
        self.warned_no_font = false;
    }

    // ── ambient ───────────────────────────────────────────────────────────

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn font(&self) -> Option<Font> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font;
        self.warned_no_font = false;
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn target_depth(&self) -> usize {
        self.targets.len()
    }

    /// Render texture receiving commands; `None` = the window.
    pub fn current_target(&self) -> Option<&RenderTexture> {
        self.targets.last()
    }

    /// Commands recorded and not yet handed to the host.
    pub fn recorded(&self) -> &DrawList {
        &self.list
    }

    // ── framing ───────────────────────────────────────────────────────────

    pub fn begin_drawing(&mut self) -> Result<(), DrawError> {
        if self.pass == Pass::Inside {
            return Err(DrawError::PassAlreadyActive);
        }
        self.pass = Pass::Inside;
        Ok(())
    }

    /// Closes the frame and returns everything recorded for the host.
    pub fn end_drawing(&mut self) -> Result<DrawList, DrawError> {
        if self.pass == Pass::Outside {
            return Err(DrawError::NoActivePass);
        }
        if !self.targets.is_empty() {
            return Err(DrawError::UnbalancedTextureMode { depth: self.targets.len() });
        }
        self.pass = Pass::Outside;
        Ok(self.list.take())
    }

    pub fn begin_texture_mode(&mut self, target: RenderTexture) {
        self.targets.push(target);
        self.list.push_target(target.attachment());
    }

    /// Pops the active render texture.
    ///
    /// Returns the offscreen list when this closes the last texture mode
    /// outside a frame; inside a frame the work stays queued for `endDrawing`.
    pub fn end_texture_mode(&mut self) -> Result<Option<DrawList>, DrawError> {
        if self.targets.pop().is_none() {
            return Err(DrawError::TargetStackEmpty);
        }
        self.list.pop_target();

        if self.targets.is_empty() && self.pass == Pass::Outside {
            Ok(Some(self.list.take()))
        } else {
            Ok(None)
        }
    }

    fn active(&mut self) -> Result<&mut DrawList, DrawError> {
        if self.pass == Pass::Inside || !self.targets.is_empty() {
            Ok(&mut self.list)
        } else {
            Err(DrawError::NoActivePass)
        }
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Fills the active target; the ambient color is left alone.
    pub fn clear(&mut self, color: Color) -> Result<(), DrawError> {
        self.active()?.push(DrawCmd::Clear(color));
        Ok(())
    }

    pub fn pixel(&mut self, x: i32, y: i32) -> Result<(), DrawError> {
        let c = self.color;
        self.active()?.push_pixel(Vec2::from_i32(x, y), c);
        Ok(())
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), DrawError> {
        let c = self.color;
        // Pixel centers, so a horizontal line covers exactly one row.
        let half = Vec2::new(0.5, 0.5);
        self.active()?
            .push_line(Vec2::from_i32(x1, y1) + half, Vec2::from_i32(x2, y2) + half, c);
        Ok(())
    }

    pub fn circle(&mut self, x: i32, y: i32, radius: f32, style: Style) -> Result<(), DrawError> {
        let c = self.color;
        self.active()?.push_circle(Vec2::from_i32(x, y), radius, style, c);
        Ok(())
    }

    pub fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, style: Style) -> Result<(), DrawError> {
        let c = self.color;
        self.active()?.push_rect(Rect::from_i32(x, y, w, h), style, c);
        Ok(())
    }

    pub fn polygon(
        &mut self,
        x: i32,
        y: i32,
        sides: i32,
        radius: f32,
        rotation: f32,
        style: Style,
    ) -> Result<(), DrawError> {
        let c = self.color;
        let sides = sides.max(0) as u32;
        self.active()?
            .push_poly(Vec2::from_i32(x, y), sides, radius, rotation, style, c);
        Ok(())
    }

    /// Text in the current font at its base size. Skipped (one warning) when
    /// no font is set.
    pub fn text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DrawError> {
        let c = self.color;
        let Some(font) = self.font_or_warn() else {
            self.active()?;
            return Ok(());
        };
        self.active()?
            .push_text(text, font.id, font.base_size, 0.0, c, Vec2::from_i32(x, y), None);
        Ok(())
    }

    /// Text wrapped to `w` and clipped to the `w` x `h` box.
    pub fn wrapped_text(&mut self, text: &str, x: i32, y: i32, w: i32, h: i32) -> Result<(), DrawError> {
        let c = self.color;
        let Some(font) = self.font_or_warn() else {
            self.active()?;
            return Ok(());
        };
        self.active()?
            .push_wrapped_text(text, font.id, font.base_size, c, Rect::from_i32(x, y, w, h));
        Ok(())
    }

    fn font_or_warn(&mut self) -> Option<Font> {
        if self.font.is_none() && !self.warned_no_font {
            log::warn!("no font loaded; text is not drawn");
            self.warned_no_font = true;
        }
        self.font
    }

    /// Whole texture at integer position, tinted by the ambient color.
    pub fn draw(&mut self, texture: Texture, x: i32, y: i32) -> Result<(), DrawError> {
        let c = self.color;
        self.active()?.push_image(texture, Vec2::from_i32(x, y), c);
        Ok(())
    }

    /// Source region into destination rect, rotated around `origin`.
    pub fn draw_pro(
        &mut self,
        texture: Texture,
        src: Rect,
        dst: Rect,
        origin: Vec2,
        rotation: f32,
    ) -> Result<(), DrawError> {
        let c = self.color;
        self.active()?.push_image_pro(texture, src, dst, origin, rotation, c);
        Ok(())
    }
}
