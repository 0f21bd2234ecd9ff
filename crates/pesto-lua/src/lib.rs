//! Lua bindings for the pesto engine.
//!
//! [`Bridge::install`] publishes two tables under the global `pesto`:
//!
//! - `pesto.filesystem`: synchronous file and directory helpers that report
//!   failure as `false`/`nil` instead of raising
//! - `pesto.graphics`: immediate-mode drawing, images and render textures,
//!   recorded into a draw list and handed to the host at `endDrawing`
//!
//! Handles returned to scripts (`Image`, `RenderTexture`) are userdata. An
//! `Image` releases its texture through the host's release queue when Lua
//! collects it; the host frees GPU storage after the frame is submitted.

mod error;
mod handles;
mod registrar;

pub mod filesystem;
pub mod graphics;

pub use error::{BridgeError, DrawError};
pub use graphics::{DrawState, Pass};
pub use handles::{ImageHandle, RenderTargetHandle};
pub use registrar::Bridge;
