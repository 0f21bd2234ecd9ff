//! Coordinate and geometry types shared by the draw stream and the renderer.
//!
//! Canonical CPU space:
//! - pixels of the active target (logical pixels for the window)
//! - origin top-left
//! - +X right, +Y down
//!
//! Conversion to NDC happens on the CPU while batching.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
