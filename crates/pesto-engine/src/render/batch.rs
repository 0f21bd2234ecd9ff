//! Splits submitted draw lists into GPU passes and batches.
//!
//! Rules:
//! - a pass covers a run of items with the same target
//! - a `Clear` at the start of a pass becomes the pass load op; later clears
//!   start a new pass
//! - inside a pass, consecutive items sharing kind and clip merge into one batch
//!
//! Everything here is CPU-only so the splitting logic is testable without a device.

use std::ops::Range;

use crate::coords::{Rect, Viewport};
use crate::paint::Color;
use crate::resources::TextureId;
use crate::scene::shapes::TextCmd;
use crate::scene::{DrawCmd, DrawList};

use super::geometry::Mesh;

/// What a batch binds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BatchKind {
    /// Untextured geometry sampling the white texel.
    Solid,
    /// An uploaded image or a render target attachment.
    Texture(TextureId),
    /// Glyph quads sampling the coverage atlas.
    Glyphs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub kind: BatchKind,
    pub clip: Option<Rect>,
    pub indices: Range<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pass {
    /// `None` = window surface.
    pub target: Option<TextureId>,
    pub clear: Option<Color>,
    pub viewport: Viewport,
    pub batches: Vec<Batch>,
}

/// A glyph placed in target pixels with its atlas region.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub rect: Rect,
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Lays out text and makes sure the glyphs it needs are resident.
pub trait GlyphCache {
    fn layout(&mut self, cmd: &TextCmd) -> Vec<GlyphQuad>;
}

/// All geometry and passes for one frame. Vertex positions are in NDC.
#[derive(Debug, Default)]
pub struct FrameBatches {
    pub mesh: Mesh,
    pub passes: Vec<Pass>,
}

/// Builds passes from `lists` in submission order.
///
/// `surface` is the window viewport; `target_viewport` resolves render target
/// sizes and returns `None` for unknown targets, whose items are dropped.
pub fn build_frame(
    lists: &[DrawList],
    surface: Viewport,
    target_viewport: impl Fn(TextureId) -> Option<Viewport>,
    glyphs: &mut dyn GlyphCache,
) -> FrameBatches {
    let mut out = FrameBatches::default();
    let mut local = Mesh::new();

    for item in lists.iter().flat_map(|l| l.items()) {
        let viewport = match item.target {
            None => surface,
            Some(t) => match target_viewport(t) {
                Some(vp) => vp,
                None => {
                    log::debug!("dropping draw into unknown target {}", t.raw());
                    continue;
                }
            },
        };

        let needs_new_pass = match out.passes.last() {
            None => true,
            Some(p) => p.target != item.target,
        };

        if let Some(color) = item.cmd.clear_color() {
            match out.passes.last_mut() {
                Some(p) if !needs_new_pass && p.batches.is_empty() => p.clear = Some(color),
                _ => out.passes.push(Pass {
                    target: item.target,
                    clear: Some(color),
                    viewport,
                    batches: Vec::new(),
                }),
            }
            continue;
        }

        if needs_new_pass {
            out.passes.push(Pass {
                target: item.target,
                clear: None,
                viewport,
                batches: Vec::new(),
            });
        }

        local.clear();
        let kind = match &item.cmd {
            DrawCmd::Clear(_) => continue,
            DrawCmd::Pixel(p) => {
                local.fill_rect(Rect::new(p.pos.x, p.pos.y, 1.0, 1.0), p.color.to_linear());
                BatchKind::Solid
            }
            DrawCmd::Line(l) => {
                local.line(l.from, l.to, crate::scene::shapes::LINE_WIDTH, l.color.to_linear());
                BatchKind::Solid
            }
            DrawCmd::Circle(c) => {
                local.circle(c);
                BatchKind::Solid
            }
            DrawCmd::Rect(r) => {
                local.rect(r);
                BatchKind::Solid
            }
            DrawCmd::Poly(p) => {
                local.poly(p);
                BatchKind::Solid
            }
            DrawCmd::Text(t) => {
                for q in glyphs.layout(t) {
                    local.glyph(q.rect, q.uv_min, q.uv_max, t.color);
                }
                BatchKind::Glyphs
            }
            DrawCmd::Image(img) => {
                if Some(img.texture.id) == item.target {
                    log::debug!("skipping draw of target {} into itself", img.texture.id.raw());
                    continue;
                }
                local.image(img);
                BatchKind::Texture(img.texture.id)
            }
        };

        if local.indices.is_empty() {
            continue;
        }

        append_ndc(&mut out.mesh, &local, viewport);
        let end = out.mesh.indices.len() as u32;
        let start = end - local.indices.len() as u32;

        let Some(pass) = out.passes.last_mut() else { continue };
        match pass.batches.last_mut() {
            Some(b) if b.kind == kind && b.clip == item.clip_rect && b.indices.end == start => {
                b.indices.end = end;
            }
            _ => pass.batches.push(Batch {
                kind,
                clip: item.clip_rect,
                indices: start..end,
            }),
        }
    }

    out
}

fn append_ndc(dst: &mut Mesh, src: &Mesh, viewport: Viewport) {
    let base = dst.vertices.len() as u32;
    dst.vertices.extend(src.vertices.iter().map(|v| {
        let mut v = *v;
        v.pos = viewport.to_ndc(v.pos[0], v.pos[1]);
        v
    }));
    dst.indices.extend(src.indices.iter().map(|i| i + base));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::resources::{PixelFormat, Texture};
    use crate::scene::Style;
    use crate::text::FontId;

    /// One 8x8 quad per character, laid out left to right.
    struct FixedGlyphs;

    impl GlyphCache for FixedGlyphs {
        fn layout(&mut self, cmd: &TextCmd) -> Vec<GlyphQuad> {
            cmd.text
                .chars()
                .enumerate()
                .map(|(i, _)| GlyphQuad {
                    rect: Rect::new(cmd.origin.x + 8.0 * i as f32, cmd.origin.y, 8.0, 8.0),
                    uv_min: [0.0, 0.0],
                    uv_max: [0.1, 0.1],
                })
                .collect()
        }
    }

    fn surface() -> Viewport {
        Viewport::new(100.0, 100.0)
    }

    fn any_target(_: TextureId) -> Option<Viewport> {
        Some(Viewport::new(32.0, 32.0))
    }

    fn build(lists: &[DrawList]) -> FrameBatches {
        build_frame(lists, surface(), any_target, &mut FixedGlyphs)
    }

    fn tid(n: u32) -> TextureId {
        TextureId::from_raw(n)
    }

    fn image(id: u32) -> Texture {
        Texture {
            id: tid(id),
            width: 4,
            height: 4,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        }
    }

    fn rect(list: &mut DrawList) {
        list.push_solid_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
    }

    // ── passes ────────────────────────────────────────────────────────────

    #[test]
    fn empty_list_has_no_passes() {
        assert!(build(&[DrawList::new()]).is_empty());
    }

    #[test]
    fn leading_clear_becomes_load_op() {
        let mut list = DrawList::new();
        list.push(DrawCmd::Clear(Color::BLACK));
        rect(&mut list);

        let f = build(&[list]);
        assert_eq!(f.passes.len(), 1);
        assert_eq!(f.passes[0].clear, Some(Color::BLACK));
        assert_eq!(f.passes[0].batches.len(), 1);
    }

    #[test]
    fn clear_after_drawing_starts_new_pass() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push(DrawCmd::Clear(Color::BLACK));
        rect(&mut list);

        let f = build(&[list]);
        assert_eq!(f.passes.len(), 2);
        assert_eq!(f.passes[0].clear, None);
        assert_eq!(f.passes[1].clear, Some(Color::BLACK));
    }

    #[test]
    fn target_switches_split_passes() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push_target(tid(9));
        rect(&mut list);
        list.pop_target();
        rect(&mut list);

        let f = build(&[list]);
        let targets: Vec<_> = f.passes.iter().map(|p| p.target).collect();
        assert_eq!(targets, vec![None, Some(tid(9)), None]);
        assert_eq!(f.passes[1].viewport, Viewport::new(32.0, 32.0));
    }

    #[test]
    fn unknown_target_items_are_dropped() {
        let mut list = DrawList::new();
        list.push_target(tid(9));
        rect(&mut list);

        let f = build_frame(&[list], surface(), |_| None, &mut FixedGlyphs);
        assert!(f.is_empty());
    }

    #[test]
    fn lists_continue_in_submission_order() {
        let mut a = DrawList::new();
        rect(&mut a);
        let mut b = DrawList::new();
        rect(&mut b);

        let f = build(&[a, b]);
        assert_eq!(f.passes.len(), 1);
        assert_eq!(f.passes[0].batches.len(), 1);
        assert_eq!(f.passes[0].batches[0].indices, 0..12);
    }

    // ── batches ───────────────────────────────────────────────────────────

    #[test]
    fn kinds_split_batches() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push_circle(Vec2::new(5.0, 5.0), 3.0, Style::Fill, Color::WHITE);
        list.push_image(image(1), Vec2::zero(), Color::WHITE);
        list.push_image(image(1), Vec2::new(4.0, 0.0), Color::WHITE);
        list.push_image(image(2), Vec2::zero(), Color::WHITE);
        list.push_text("hi", FontId(0), 8.0, 0.0, Color::WHITE, Vec2::zero(), None);

        let f = build(&[list]);
        let kinds: Vec<_> = f.passes[0].batches.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BatchKind::Solid,
                BatchKind::Texture(tid(1)),
                BatchKind::Texture(tid(2)),
                BatchKind::Glyphs,
            ]
        );
        let glyphs = f.passes[0].batches.last().map(|b| b.indices.len());
        assert_eq!(glyphs, Some(2 * 6));
    }

    #[test]
    fn clip_change_splits_batch() {
        let mut list = DrawList::new();
        rect(&mut list);
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        rect(&mut list);
        list.pop_clip();

        let f = build(&[list]);
        assert_eq!(f.passes[0].batches.len(), 2);
        assert_eq!(f.passes[0].batches[1].clip, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn target_is_never_sampled_into_itself() {
        let mut list = DrawList::new();
        list.push_target(tid(5));
        list.push_image(image(5), Vec2::zero(), Color::WHITE);

        let f = build(&[list]);
        assert!(f.passes[0].batches.is_empty());
    }

    #[test]
    fn positions_are_mapped_to_ndc() {
        let mut list = DrawList::new();
        rect(&mut list);

        let f = build(&[list]);
        assert_eq!(f.mesh.vertices[0].pos, [-1.0, 1.0]);
        let [x, y] = f.mesh.vertices[2].pos;
        assert!((x + 0.8).abs() < 1e-6 && (y - 0.8).abs() < 1e-6);
    }
}
