//! CPU tessellation of draw commands into indexed triangles.
//!
//! Output positions are in target pixels; the batcher maps them to NDC once the
//! pass viewport is known.

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::shapes::{CircleCmd, ImageCmd, PolyCmd, RectCmd, LINE_WIDTH, MAX_SIDES};
use crate::scene::Style;

/// Vertex layout (32 bytes):
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  uv     [f32; 2]   loc 1
///  offset 16  color  [f32; 4]   loc 2  (linear, straight alpha)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // uv
        2 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// UV used for untextured geometry; the solid batch binds a 1x1 white texture.
const SOLID_UV: [f32; 2] = [0.5, 0.5];

/// Segments used to approximate a circle of radius `r`.
pub(crate) fn circle_segments(r: f32) -> u32 {
    ((r.abs().sqrt() * 8.0).ceil() as u32).clamp(12, MAX_SIDES)
}

/// Growable triangle mesh.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Quad from four corners (TL, TR, BR, BL) with matching UVs.
    pub fn quad(&mut self, corners: [Vec2; 4], uvs: [[f32; 2]; 4], color: [f32; 4]) {
        let b = self.base();
        for (p, uv) in corners.iter().zip(uvs) {
            self.vertices.push(Vertex { pos: [p.x, p.y], uv, color });
        }
        self.indices.extend_from_slice(&[b, b + 1, b + 2, b, b + 2, b + 3]);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [f32; 4]) {
        let r = rect.normalized();
        if r.is_empty() {
            return;
        }
        let (lo, hi) = (r.origin, r.max());
        self.quad(
            [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)],
            [SOLID_UV; 4],
            color,
        );
    }

    /// 1 px frame drawn inside `rect`.
    pub fn outline_rect(&mut self, rect: Rect, color: [f32; 4]) {
        let r = rect.normalized();
        let w = LINE_WIDTH;
        if r.size.x <= 2.0 * w || r.size.y <= 2.0 * w {
            self.fill_rect(r, color);
            return;
        }
        let (x, y, rw, rh) = (r.origin.x, r.origin.y, r.size.x, r.size.y);
        self.fill_rect(Rect::new(x, y, rw, w), color);
        self.fill_rect(Rect::new(x, y + rh - w, rw, w), color);
        self.fill_rect(Rect::new(x, y + w, w, rh - 2.0 * w), color);
        self.fill_rect(Rect::new(x + rw - w, y + w, w, rh - 2.0 * w), color);
    }

    /// Segment of the given width, extended by half a width at both ends so
    /// consecutive segments close their joints.
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        let d = to - from;
        let len = d.length();
        if len <= f32::EPSILON {
            let h = width * 0.5;
            self.fill_rect(Rect::new(from.x - h, from.y - h, width, width), color);
            return;
        }
        let dir = d * (1.0 / len);
        let n = Vec2::new(-dir.y, dir.x) * (width * 0.5);
        let ext = dir * (width * 0.5);
        let (a, b) = (from - ext, to + ext);
        self.quad([a + n, b + n, b - n, a - n], [SOLID_UV; 4], color);
    }

    /// Convex fan around `center` through `ring` (in order).
    pub fn fan(&mut self, center: Vec2, ring: &[Vec2], color: [f32; 4]) {
        if ring.len() < 3 {
            return;
        }
        let c = self.base();
        self.vertices.push(Vertex { pos: [center.x, center.y], uv: SOLID_UV, color });
        for p in ring {
            self.vertices.push(Vertex { pos: [p.x, p.y], uv: SOLID_UV, color });
        }
        let n = ring.len() as u32;
        for i in 0..n {
            let a = c + 1 + i;
            let b = c + 1 + (i + 1) % n;
            self.indices.extend_from_slice(&[c, a, b]);
        }
    }

    pub fn closed_polyline(&mut self, ring: &[Vec2], width: f32, color: [f32; 4]) {
        for (i, &a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            self.line(a, b, width, color);
        }
    }

    pub fn circle(&mut self, cmd: &CircleCmd) {
        let ring = regular_ring(cmd.center, circle_segments(cmd.radius), cmd.radius, 0.0);
        let color = cmd.color.to_linear();
        match cmd.style {
            Style::Fill => self.fan(cmd.center, &ring, color),
            Style::Outline => self.closed_polyline(&ring, LINE_WIDTH, color),
        }
    }

    pub fn rect(&mut self, cmd: &RectCmd) {
        let color = cmd.color.to_linear();
        match cmd.style {
            Style::Fill => self.fill_rect(cmd.rect, color),
            Style::Outline => self.outline_rect(cmd.rect, color),
        }
    }

    pub fn poly(&mut self, cmd: &PolyCmd) {
        let ring = regular_ring(cmd.center, cmd.sides, cmd.radius, cmd.rotation);
        let color = cmd.color.to_linear();
        match cmd.style {
            Style::Fill => self.fan(cmd.center, &ring, color),
            Style::Outline => self.closed_polyline(&ring, LINE_WIDTH, color),
        }
    }

    /// Textured quad. UVs are normalized against the texture size; negative
    /// source extents mirror the sampled region.
    pub fn image(&mut self, cmd: &ImageCmd) {
        let tw = cmd.texture.width.max(1) as f32;
        let th = cmd.texture.height.max(1) as f32;

        let dst = Rect::new(
            cmd.dst.origin.x,
            cmd.dst.origin.y,
            cmd.dst.size.x.abs(),
            cmd.dst.size.y.abs(),
        );
        if dst.is_empty() {
            return;
        }

        // A negative source extent yields u1 < u0 (or v1 < v0), which mirrors the quad.
        let (u0, u1) = (cmd.src.origin.x / tw, (cmd.src.origin.x + cmd.src.size.x) / tw);
        let (v0, v1) = (cmd.src.origin.y / th, (cmd.src.origin.y + cmd.src.size.y) / th);

        let corners = dst.pivoted_corners(cmd.origin, cmd.rotation);
        self.quad(corners, [[u0, v0], [u1, v0], [u1, v1], [u0, v1]], cmd.tint.to_linear());
    }

    /// Appends a glyph quad already placed in target pixels.
    pub fn glyph(&mut self, rect: Rect, uv_min: [f32; 2], uv_max: [f32; 2], color: Color) {
        let (lo, hi) = (rect.origin, rect.max());
        self.quad(
            [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)],
            [
                uv_min,
                [uv_max[0], uv_min[1]],
                uv_max,
                [uv_min[0], uv_max[1]],
            ],
            color.to_linear(),
        );
    }
}

/// Points of a regular polygon; the first sits at `rotation` degrees from +X.
pub(crate) fn regular_ring(center: Vec2, sides: u32, radius: f32, rotation: f32) -> Vec<Vec2> {
    let sides = sides.clamp(3, MAX_SIDES);
    let step = 360.0 / sides as f32;
    (0..sides)
        .map(|i| center + Vec2::new(radius, 0.0).rotated(rotation + step * i as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{PixelFormat, Texture, TextureId};

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn tex(w: u32, h: u32) -> Texture {
        Texture {
            id: TextureId::from_raw(1),
            width: w,
            height: h,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        }
    }

    fn image_cmd(src: Rect, dst: Rect) -> ImageCmd {
        ImageCmd {
            texture: tex(10, 20),
            src,
            dst,
            origin: Vec2::zero(),
            rotation: 0.0,
            tint: Color::WHITE,
        }
    }

    // ── rects ─────────────────────────────────────────────────────────────

    #[test]
    fn fill_rect_is_two_triangles() {
        let mut m = Mesh::new();
        m.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), WHITE);
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(m.vertices[2].pos, [4.0, 6.0]);
    }

    #[test]
    fn empty_rect_emits_nothing() {
        let mut m = Mesh::new();
        m.fill_rect(Rect::new(1.0, 2.0, 0.0, 4.0), WHITE);
        assert!(m.vertices.is_empty());
    }

    #[test]
    fn outline_rect_is_four_strips() {
        let mut m = Mesh::new();
        m.outline_rect(Rect::new(0.0, 0.0, 10.0, 10.0), WHITE);
        assert_eq!(m.indices.len(), 4 * 6);
    }

    #[test]
    fn tiny_outline_collapses_to_fill() {
        let mut m = Mesh::new();
        m.outline_rect(Rect::new(0.0, 0.0, 2.0, 2.0), WHITE);
        assert_eq!(m.indices.len(), 6);
    }

    // ── fans ──────────────────────────────────────────────────────────────

    #[test]
    fn polygon_fan_has_one_triangle_per_side() {
        let mut m = Mesh::new();
        m.poly(&PolyCmd {
            center: Vec2::new(50.0, 50.0),
            sides: 6,
            radius: 10.0,
            rotation: 0.0,
            style: Style::Fill,
            color: Color::WHITE,
        });
        assert_eq!(m.vertices.len(), 7);
        assert_eq!(m.indices.len(), 6 * 3);
        // first ring vertex at +X
        assert_eq!(m.vertices[1].pos, [60.0, 50.0]);
    }

    #[test]
    fn ring_size_is_bounded() {
        assert_eq!(regular_ring(Vec2::new(0.0, 0.0), 0, 5.0, 0.0).len(), 3);
        assert_eq!(regular_ring(Vec2::new(0.0, 0.0), u32::MAX, 5.0, 0.0).len(), MAX_SIDES as usize);
    }

    #[test]
    fn circle_segments_grow_with_radius() {
        assert_eq!(circle_segments(0.5), 12);
        assert!(circle_segments(100.0) > circle_segments(10.0));
        assert_eq!(circle_segments(1.0e9), 256);
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn image_uvs_cover_source_region() {
        let mut m = Mesh::new();
        m.image(&image_cmd(Rect::new(5.0, 10.0, 5.0, 10.0), Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(m.vertices[0].uv, [0.5, 0.5]);
        assert_eq!(m.vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn negative_source_height_flips_vertically() {
        let mut m = Mesh::new();
        m.image(&image_cmd(Rect::new(0.0, 20.0, 10.0, -20.0), Rect::new(0.0, 0.0, 10.0, 20.0)));
        assert_eq!(m.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(m.vertices[3].uv, [0.0, 0.0]);
    }
}
