//! Paint model shared by the draw stream and the renderer.
//!
//! Scripts speak straight-alpha sRGB bytes; the renderer works in linear
//! straight-alpha floats. `Color` owns both representations.

pub mod color;

pub use color::Color;
