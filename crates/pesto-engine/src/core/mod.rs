//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the layer
//! that drives scripts, plus the per-frame context handed to it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
