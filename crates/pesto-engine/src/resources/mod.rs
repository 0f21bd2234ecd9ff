//! Texture bookkeeping shared by the bridge and the renderer.
//!
//! Lifecycle:
//! - `ResourceStore` hands out descriptors and queues decoded pixels for upload
//! - script-side handles push ids onto a `ReleaseQueue` when collected
//! - the runtime calls `collect_garbage()` after a frame is submitted and frees
//!   the returned GPU textures
//!
//! Nothing here owns GPU objects; `render::GpuTextures` mirrors the store.

mod release;
mod store;
mod texture;

pub use release::ReleaseQueue;
pub use store::{PendingUpload, ResourceStore};
pub use texture::{PixelFormat, RenderTexture, Texture, TextureId};
