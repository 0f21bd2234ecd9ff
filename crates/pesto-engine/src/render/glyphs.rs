//! Glyph rasterization into a shared coverage atlas.

use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Rect;
use crate::scene::shapes::TextCmd;
use crate::text::FontSystem;

use super::batch::{GlyphCache, GlyphQuad};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── shelf packing ─────────────────────────────────────────────────────────

/// Row-based packer: glyphs fill a shelf left to right; a glyph that does not
/// fit opens a new shelf below the tallest glyph of the current one.
#[derive(Debug, Clone)]
pub(crate) struct ShelfPacker {
    size: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    pub(crate) fn new(size: u32, padding: u32) -> Self {
        Self {
            size,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
            full: false,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.full
    }

    /// Reserves a `w` x `h` slot and returns its top-left corner.
    pub(crate) fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * self.padding > self.size {
            return None;
        }

        if self.cursor_x + w + self.padding > self.size {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        if self.cursor_y + h + self.padding > self.size {
            self.full = true;
            return None;
        }

        let at = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(at)
    }
}

// ── atlas ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// R8 coverage atlas shared by every font and size.
///
/// The cache key is `fontdue::layout::GlyphRasterConfig` (font, glyph, size), so
/// a glyph is rasterized once for the renderer's lifetime. When the atlas fills
/// up, new glyphs are dropped with a single warning.
pub struct GlyphAtlas {
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    packer: ShelfPacker,
    cache: HashMap<GlyphRasterConfig, CachedGlyph>,
    layout: Layout<()>,
    warned_full: bool,
    warned_unknown_font: bool,
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self {
            texture: None,
            view: None,
            packer: ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING),
            cache: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            warned_full: false,
            warned_unknown_font: false,
        }
    }
}

impl GlyphAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ensure_texture(&mut self, device: &wgpu::Device) {
        if self.texture.is_some() {
            return;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pesto glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.packer = ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING);
        self.cache.clear();
    }

    pub(crate) fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    /// Binds the atlas to the fonts and queue needed to fill it.
    pub(crate) fn with<'a>(
        &'a mut self,
        fonts: &'a FontSystem,
        queue: &'a wgpu::Queue,
    ) -> AtlasGlyphs<'a> {
        AtlasGlyphs { atlas: self, fonts, queue }
    }

    fn upload(&mut self, queue: &wgpu::Queue, bitmap: &[u8], w: u32, h: u32) -> Option<CachedGlyph> {
        let Some((gx, gy)) = self.packer.place(w, h) else {
            if self.packer.is_full() && !self.warned_full {
                log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be drawn");
                self.warned_full = true;
            }
            return None;
        };
        let atlas = self.texture.as_ref()?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let s = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / s, gy as f32 / s],
            uv_max: [(gx + w) as f32 / s, (gy + h) as f32 / s],
        })
    }
}

/// [`GlyphCache`] backed by a GPU atlas.
pub(crate) struct AtlasGlyphs<'a> {
    atlas: &'a mut GlyphAtlas,
    fonts: &'a FontSystem,
    queue: &'a wgpu::Queue,
}

impl GlyphCache for AtlasGlyphs<'_> {
    fn layout(&mut self, cmd: &TextCmd) -> Vec<GlyphQuad> {
        let Some(font) = self.fonts.get(cmd.font) else {
            if !self.atlas.warned_unknown_font {
                log::warn!("text uses unknown font {:?}; skipping", cmd.font);
                self.atlas.warned_unknown_font = true;
            }
            return Vec::new();
        };

        self.atlas.layout.reset(&LayoutSettings {
            x: cmd.origin.x,
            y: cmd.origin.y,
            max_width: cmd.max_width,
            ..LayoutSettings::default()
        });
        self.atlas.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size, 0));

        // Snapshot positions so the layout borrow ends before the atlas is mutated.
        let mut column = 0u32;
        let placed: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .atlas
            .layout
            .glyphs()
            .iter()
            .filter_map(|g| {
                let dx = cmd.spacing * column as f32;
                if g.parent == '\n' {
                    column = 0;
                } else {
                    column += 1;
                }
                (g.char_data.rasterize() && g.width > 0 && g.height > 0)
                    .then_some((g.key, g.x + dx, g.y, g.width, g.height))
            })
            .collect();

        let mut quads = Vec::with_capacity(placed.len());
        for (key, x, y, w, h) in placed {
            if !self.atlas.cache.contains_key(&key) {
                let (metrics, bitmap) = font.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                match self.atlas.upload(self.queue, &bitmap, metrics.width as u32, metrics.height as u32) {
                    Some(entry) => {
                        self.atlas.cache.insert(key, entry);
                    }
                    None => continue,
                }
            }

            let Some(cached) = self.atlas.cache.get(&key) else { continue };
            quads.push(GlyphQuad {
                rect: Rect::new(x, y, w as f32, h as f32),
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
            });
        }
        quads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_slot_is_padded() {
        let mut p = ShelfPacker::new(64, 1);
        assert_eq!(p.place(10, 10), Some((1, 1)));
        assert_eq!(p.place(10, 4), Some((12, 1)));
    }

    #[test]
    fn overflowing_row_opens_new_shelf() {
        let mut p = ShelfPacker::new(32, 1);
        assert_eq!(p.place(20, 5), Some((1, 1)));
        assert_eq!(p.place(20, 8), Some((1, 7)));
    }

    #[test]
    fn exhausted_atlas_stays_full() {
        let mut p = ShelfPacker::new(16, 1);
        assert!(p.place(14, 14).is_some());
        assert_eq!(p.place(14, 14), None);
        assert!(p.is_full());
        assert_eq!(p.place(1, 1), None);
    }

    #[test]
    fn oversized_glyph_is_rejected_without_filling() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(40, 2), None);
        assert!(!p.is_full());
    }
}
