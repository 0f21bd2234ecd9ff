//! GPU mirror of `resources::ResourceStore`.

use std::collections::HashMap;

use crate::resources::{PendingUpload, RenderTexture, TextureId};

/// One GPU texture plus the bind group that samples it.
pub(crate) struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub size: (u32, u32),
}

/// Images, render targets and the 1x1 white texel used by solid geometry.
///
/// Images are sampled with nearest filtering; the glyph atlas gets its own
/// linear sampler.
#[derive(Default)]
pub(crate) struct GpuTextures {
    images: HashMap<TextureId, GpuTexture>,
    targets: HashMap<TextureId, GpuTexture>,
    white: Option<GpuTexture>,
    glyph_bind_group: Option<wgpu::BindGroup>,

    nearest: Option<wgpu::Sampler>,
    linear: Option<wgpu::Sampler>,
}

impl GpuTextures {
    pub(crate) fn ensure_samplers(&mut self, device: &wgpu::Device) {
        if self.nearest.is_none() {
            self.nearest = Some(device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("pesto nearest sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
        if self.linear.is_none() {
            self.linear = Some(device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("pesto glyph sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
    }

    fn bind(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        label: &str,
    ) -> Option<GpuTexture> {
        let sampler = self.nearest.as_ref()?;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Self::bind(device, layout, &view, sampler, label);
        Some(GpuTexture { texture, view, bind_group, size })
    }

    fn write_rgba(queue: &wgpu::Queue, texture: &wgpu::Texture, size: (u32, u32), rgba: &[u8]) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.0 * 4),
                rows_per_image: Some(size.1),
            },
            wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
        );
    }

    pub(crate) fn ensure_white(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        if self.white.is_some() {
            return;
        }
        let Some(tex) = self.create(
            device,
            layout,
            (1, 1),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            "pesto white texel",
        ) else {
            return;
        };
        Self::write_rgba(queue, &tex.texture, (1, 1), &[255, 255, 255, 255]);
        self.white = Some(tex);
    }

    /// Rebuilt whenever the atlas view is recreated.
    pub(crate) fn ensure_glyph_binding(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        atlas: &wgpu::TextureView,
    ) {
        if self.glyph_bind_group.is_some() {
            return;
        }
        let Some(sampler) = self.linear.as_ref() else { return };
        self.glyph_bind_group = Some(Self::bind(device, layout, atlas, sampler, "pesto glyph bind group"));
    }

    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        up: &PendingUpload,
    ) {
        let size = (up.width, up.height);
        let Some(tex) = self.create(
            device,
            layout,
            size,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            "pesto image",
        ) else {
            return;
        };
        Self::write_rgba(queue, &tex.texture, size, &up.rgba);
        self.images.insert(up.id, tex);
    }

    /// Creates the color attachment of `rt` in the surface format.
    pub(crate) fn create_target(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
        rt: &RenderTexture,
    ) {
        let Some(tex) = self.create(
            device,
            layout,
            (rt.width, rt.height),
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            "pesto render target",
        ) else {
            return;
        };
        self.targets.insert(rt.attachment(), tex);
    }

    /// Frees image storage. Render targets are never released.
    pub(crate) fn release(&mut self, id: TextureId) {
        if let Some(tex) = self.images.remove(&id) {
            tex.texture.destroy();
        }
    }

    pub(crate) fn white_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.white.as_ref().map(|t| &t.bind_group)
    }

    pub(crate) fn glyph_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.glyph_bind_group.as_ref()
    }

    /// Bind group sampling an image or a render target attachment.
    pub(crate) fn sampled(&self, id: TextureId) -> Option<&wgpu::BindGroup> {
        self.images
            .get(&id)
            .or_else(|| self.targets.get(&id))
            .map(|t| &t.bind_group)
    }

    pub(crate) fn target(&self, id: TextureId) -> Option<&GpuTexture> {
        self.targets.get(&id)
    }
}
