//! GPU rendering subsystem.
//!
//! The renderer consumes submitted `scene` draw lists and issues GPU commands
//! via wgpu.
//!
//! Convention:
//! - CPU geometry is in target pixels (top-left origin, +Y down)
//! - `batch` maps it to NDC per pass, so the shader needs no viewport uniform
//! - render targets are stored upright and share the surface format

mod batch;
mod ctx;
mod geometry;
mod glyphs;
mod renderer;
mod textures;

pub use batch::{build_frame, Batch, BatchKind, FrameBatches, GlyphCache, GlyphQuad, Pass};
pub use ctx::{RenderCtx, RenderTarget};
pub use geometry::{Mesh, Vertex};
pub use glyphs::GlyphAtlas;
pub use renderer::Renderer;
