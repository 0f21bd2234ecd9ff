use std::collections::HashMap;
use std::path::Path;

use image::DynamicImage;

use super::{PixelFormat, ReleaseQueue, RenderTexture, Texture, TextureId};

/// Largest texture edge the store hands out.
const MAX_TEXTURE_SIZE: u32 = 8192;

/// Decoded pixels waiting for the renderer.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub rgba: Vec<u8>,
}

/// Host-side registry of textures and render targets.
#[derive(Debug)]
pub struct ResourceStore {
    next_id: u32,
    textures: HashMap<TextureId, Texture>,
    targets: HashMap<TextureId, RenderTexture>,

    uploads: Vec<PendingUpload>,
    new_targets: Vec<RenderTexture>,

    releases: ReleaseQueue,
    released_total: u64,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            textures: HashMap::new(),
            targets: HashMap::new(),
            uploads: Vec::new(),
            new_targets: Vec::new(),
            releases: ReleaseQueue::new(),
            released_total: 0,
        }
    }

    /// Queue shared with script-side handles.
    pub fn release_queue(&self) -> ReleaseQueue {
        self.releases.clone()
    }

    fn alloc_id(&mut self) -> TextureId {
        let id = TextureId::from_raw(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Decodes the image at `path` and registers it.
    ///
    /// Failures are logged and produce [`Texture::none`].
    pub fn load_texture(&mut self, path: &Path) -> Texture {
        match image::open(path) {
            Ok(img) => {
                let tex = self.insert_image(img);
                log::debug!(
                    "loaded texture {} ({}x{}) from {}",
                    tex.id.raw(),
                    tex.width,
                    tex.height,
                    path.display()
                );
                tex
            }
            Err(e) => {
                log::warn!("failed to load image {}: {e}", path.display());
                Texture::none()
            }
        }
    }

    /// Registers an already decoded image and queues its pixels for upload.
    pub fn insert_image(&mut self, img: DynamicImage) -> Texture {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            log::warn!("image size {width}x{height} is not supported");
            return Texture::none();
        }

        let format = PixelFormat::from_color_type(img.color());
        let rgba = img.into_rgba8().into_raw();

        let tex = Texture {
            id: self.alloc_id(),
            width,
            height,
            mipmaps: 1,
            format,
        };
        self.textures.insert(tex.id, tex);
        self.uploads.push(PendingUpload { id: tex.id, width, height, rgba });
        tex
    }

    /// Registers a render target of `width` x `height` pixels.
    ///
    /// The target and its color attachment get distinct ids. Targets are never
    /// released before the store is dropped.
    pub fn create_render_texture(&mut self, width: u32, height: u32) -> RenderTexture {
        if width == 0 || height == 0 || width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            log::warn!("render texture size {width}x{height} is not supported");
            return RenderTexture::none();
        }

        let id = self.alloc_id();
        let texture = Texture {
            id: self.alloc_id(),
            width,
            height,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        };
        let rt = RenderTexture { id, width, height, texture };

        self.targets.insert(texture.id, rt);
        self.new_targets.push(rt);
        log::debug!("created render texture {} ({width}x{height})", id.raw());
        rt
    }

    /// Pixels decoded since the last call.
    pub fn take_uploads(&mut self) -> Vec<PendingUpload> {
        std::mem::take(&mut self.uploads)
    }

    /// Render targets created since the last call.
    pub fn take_new_targets(&mut self) -> Vec<RenderTexture> {
        std::mem::take(&mut self.new_targets)
    }

    /// Applies queued releases and returns the ids whose GPU storage can go.
    ///
    /// Call only after every draw list that might sample those textures has
    /// been submitted. Unknown or already released ids are ignored.
    pub fn collect_garbage(&mut self) -> Vec<TextureId> {
        let mut freed = Vec::new();
        for id in self.releases.drain() {
            if self.textures.remove(&id).is_none() {
                log::debug!("ignoring release of unknown texture {}", id.raw());
                continue;
            }
            // Never uploaded: nothing on the GPU yet, just drop the pixels.
            self.uploads.retain(|u| u.id != id);
            self.released_total += 1;
            freed.push(id);
        }
        if !freed.is_empty() {
            log::debug!("released {} texture(s)", freed.len());
        }
        freed
    }

    /// Image textures currently alive (render targets excluded).
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_render_textures(&self) -> usize {
        self.targets.len()
    }

    /// Textures released since the store was created.
    pub fn released_total(&self) -> u64 {
        self.released_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        }))
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn ids_are_non_zero_and_unique() {
        let mut store = ResourceStore::new();
        let a = store.insert_image(checker(2, 2));
        let b = store.insert_image(checker(4, 1));
        assert!(!a.id.is_null());
        assert_ne!(a.id, b.id);
        assert_eq!((b.width, b.height, b.mipmaps), (4, 1, 1));
        assert_eq!(store.live_textures(), 2);
    }

    #[test]
    fn uploads_are_rgba8() {
        let mut store = ResourceStore::new();
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(3, 2));
        let tex = store.insert_image(gray);
        assert_eq!(tex.format, PixelFormat::Grayscale);

        let uploads = store.take_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].rgba.len(), 3 * 2 * 4);
        assert!(store.take_uploads().is_empty());
    }

    #[test]
    fn missing_file_yields_null_texture() {
        let mut store = ResourceStore::new();
        let tex = store.load_texture(Path::new("/definitely/not/here.png"));
        assert_eq!(tex, Texture::none());
        assert_eq!(store.live_textures(), 0);
    }

    #[test]
    fn render_texture_has_distinct_attachment() {
        let mut store = ResourceStore::new();
        let rt = store.create_render_texture(64, 32);
        assert_ne!(rt.id, rt.texture.id);
        assert_eq!((rt.texture.width, rt.texture.height), (64, 32));
        assert_eq!(store.live_render_textures(), 1);
        assert_eq!(store.take_new_targets(), vec![rt]);
    }

    #[test]
    fn zero_sized_render_texture_is_null() {
        let mut store = ResourceStore::new();
        assert_eq!(store.create_render_texture(0, 10), RenderTexture::none());
    }

    // ── release ───────────────────────────────────────────────────────────

    #[test]
    fn release_is_deferred_until_collect() {
        let mut store = ResourceStore::new();
        let tex = store.insert_image(checker(2, 2));
        store.release_queue().push(tex.id);

        assert_eq!(store.live_textures(), 1);
        assert_eq!(store.collect_garbage(), vec![tex.id]);
        assert_eq!(store.live_textures(), 0);
        assert_eq!(store.released_total(), 1);
    }

    #[test]
    fn double_release_counts_once() {
        let mut store = ResourceStore::new();
        let tex = store.insert_image(checker(2, 2));
        let q = store.release_queue();
        q.push(tex.id);
        q.push(tex.id);
        q.push(TextureId::NULL);

        assert_eq!(store.collect_garbage(), vec![tex.id]);
        q.push(tex.id);
        assert!(store.collect_garbage().is_empty());
        assert_eq!(store.released_total(), 1);
    }

    #[test]
    fn release_before_upload_drops_pixels() {
        let mut store = ResourceStore::new();
        let tex = store.insert_image(checker(2, 2));
        store.release_queue().push(tex.id);
        store.collect_garbage();
        assert!(store.take_uploads().is_empty());
    }
}
