/// Host-side texture identifier. `0` means "no GPU storage".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct TextureId(u32);

impl TextureId {
    pub const NULL: TextureId = TextureId(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Pixel layout of the decoded source image.
///
/// Discriminants are the values scripts observe through `image.format`.
/// GPU storage is always RGBA8 regardless of the source layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(u8)]
pub enum PixelFormat {
    Grayscale = 1,
    GrayAlpha = 2,
    R8G8B8 = 4,
    #[default]
    R8G8B8A8 = 7,
}

impl PixelFormat {
    #[inline]
    pub fn code(self) -> i64 {
        self as u8 as i64
    }

    /// Maps a decoded image layout onto the closest format code.
    pub fn from_color_type(ct: image::ColorType) -> Self {
        use image::ColorType;
        match ct {
            ColorType::L8 | ColorType::L16 => PixelFormat::Grayscale,
            ColorType::La8 | ColorType::La16 => PixelFormat::GrayAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => PixelFormat::R8G8B8,
            _ => PixelFormat::R8G8B8A8,
        }
    }
}

/// Texture descriptor as seen by scripts.
///
/// Plain data: copying it never touches GPU storage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    pub mipmaps: u32,
    pub format: PixelFormat,
}

impl Texture {
    /// Descriptor of a texture that failed to load.
    #[inline]
    pub fn none() -> Self {
        Self {
            id: TextureId::NULL,
            width: 0,
            height: 0,
            mipmaps: 0,
            format: PixelFormat::R8G8B8A8,
        }
    }
}

/// Offscreen render target and its color attachment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct RenderTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    pub texture: Texture,
}

impl RenderTexture {
    #[inline]
    pub fn none() -> Self {
        Self {
            id: TextureId::NULL,
            width: 0,
            height: 0,
            texture: Texture::none(),
        }
    }

    /// Id the draw list uses when this target is active.
    #[inline]
    pub fn attachment(&self) -> TextureId {
        self.texture.id
    }
}
