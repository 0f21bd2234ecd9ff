use crate::coords::{Rect, Viewport};
use crate::paint::Color;
use crate::resources::{ResourceStore, TextureId};
use crate::scene::DrawList;
use crate::text::FontSystem;

use super::batch::{build_frame, BatchKind, Pass};
use super::geometry::Vertex;
use super::glyphs::GlyphAtlas;
use super::textures::GpuTextures;
use super::{RenderCtx, RenderTarget};

/// Draws submitted lists with one shader and two pipelines (textured, glyph).
///
/// GPU objects are created lazily on first use, then reused; vertex and index
/// buffers grow to the next power of two and never shrink.
pub struct Renderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    texture_pipeline: Option<wgpu::RenderPipeline>,
    glyph_pipeline: Option<wgpu::RenderPipeline>,

    textures: GpuTextures,
    atlas: GlyphAtlas,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    warned_missing_texture: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            bind_group_layout: None,
            texture_pipeline: None,
            glyph_pipeline: None,
            textures: GpuTextures::default(),
            atlas: GlyphAtlas::new(),
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
            warned_missing_texture: false,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates GPU storage for textures and render targets registered since the
    /// last call.
    pub fn sync_resources(&mut self, ctx: &RenderCtx<'_>, store: &mut ResourceStore) {
        self.ensure_pipelines(ctx);
        self.textures.ensure_samplers(ctx.device);
        let Some(layout) = self.bind_group_layout.as_ref() else { return };

        for up in store.take_uploads() {
            self.textures.upload(ctx.device, ctx.queue, layout, &up);
        }
        for rt in store.take_new_targets() {
            self.textures.create_target(ctx.device, layout, ctx.surface_format, &rt);
        }
    }

    /// Frees the GPU storage of released images.
    ///
    /// Call after the frame that may still sample them has been submitted.
    pub fn release(&mut self, ids: &[TextureId]) {
        for &id in ids {
            self.textures.release(id);
        }
    }

    /// Records every pass for `lists` into `target.encoder`.
    ///
    /// The window surface is always cleared once (black unless a list clears it
    /// first); render targets keep their contents across frames.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        lists: &[DrawList],
        fonts: &FontSystem,
    ) {
        self.ensure_pipelines(ctx);
        self.textures.ensure_samplers(ctx.device);
        self.atlas.ensure_texture(ctx.device);
        if let Some(layout) = self.bind_group_layout.as_ref() {
            self.textures.ensure_white(ctx.device, ctx.queue, layout);
            if let Some(view) = self.atlas.view() {
                self.textures.ensure_glyph_binding(ctx.device, layout, view);
            }
        }

        let textures = &self.textures;
        let mut glyphs = self.atlas.with(fonts, ctx.queue);
        let mut frame = build_frame(
            lists,
            ctx.viewport,
            |id| textures.target(id).map(|t| Viewport::from_pixels(t.size.0, t.size.1)),
            &mut glyphs,
        );

        match frame.passes.iter().position(|p| p.target.is_none()) {
            Some(i) => {
                frame.passes[i].clear.get_or_insert(Color::BLACK);
            }
            None => frame.passes.push(Pass {
                target: None,
                clear: Some(Color::BLACK),
                viewport: ctx.viewport,
                batches: Vec::new(),
            }),
        }

        self.ensure_buffer_capacity(ctx, frame.mesh.vertices.len(), frame.mesh.indices.len());
        if let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) {
            if !frame.mesh.indices.is_empty() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&frame.mesh.vertices));
                ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&frame.mesh.indices));
            }
        }

        for pass in &frame.passes {
            self.record_pass(ctx, target, pass);
        }
    }

    fn record_pass(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, pass: &Pass) {
        let (view, scale) = match pass.target {
            None => (target.color_view, ctx.scale_factor),
            Some(id) => match self.textures.target(id) {
                Some(t) => (&t.view, 1.0),
                None => return,
            },
        };

        let load = match pass.clear {
            Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pesto pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if pass.batches.is_empty() {
            return;
        }

        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else { return };
        let (Some(textured), Some(glyph)) = (self.texture_pipeline.as_ref(), self.glyph_pipeline.as_ref())
        else {
            return;
        };

        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

        for batch in &pass.batches {
            let Some((x, y, w, h)) = clip_to_scissor(batch.clip, pass.viewport, scale) else {
                continue;
            };

            let (pipeline, bind_group) = match batch.kind {
                BatchKind::Solid => (textured, self.textures.white_bind_group()),
                BatchKind::Texture(id) => (textured, self.textures.sampled(id)),
                BatchKind::Glyphs => (glyph, self.textures.glyph_bind_group()),
            };
            let Some(bind_group) = bind_group else {
                if !self.warned_missing_texture {
                    log::warn!("skipping batch {:?}: texture is not resident", batch.kind);
                    self.warned_missing_texture = true;
                }
                continue;
            };

            rpass.set_scissor_rect(x, y, w, h);
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[]);
            rpass.draw_indexed(batch.indices.clone(), 0, 0..1);
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.texture_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pesto shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pesto.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pesto texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pesto pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let make = |label: &str, fs: &str| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.texture_pipeline = Some(make("pesto texture pipeline", "fs_texture"));
        self.glyph_pipeline = Some(make("pesto glyph pipeline", "fs_glyph"));
        self.bind_group_layout = Some(bgl);
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_buffer_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(1024);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pesto vbo"),
                size: (cap * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }
        if indices > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(1024);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("pesto ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }
    }
}

/// Converts a clip rect in pass pixels to a physical scissor rect.
///
/// Returns `None` for zero-area clips (the batch is skipped). `clip = None`
/// covers the whole viewport.
fn clip_to_scissor(clip: Option<Rect>, viewport: Viewport, scale: f32) -> Option<(u32, u32, u32, u32)> {
    let vw = (viewport.width * scale).max(1.0) as u32;
    let vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, vw, vh),
        Some(r) => {
            let x = ((r.origin.x * scale).max(0.0) as u32).min(vw);
            let y = ((r.origin.y * scale).max(0.0) as u32).min(vh);
            let x2 = (((r.origin.x + r.size.x) * scale).max(0.0) as u32).min(vw);
            let y2 = (((r.origin.y + r.size.y) * scale).max(0.0) as u32).min(vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}
