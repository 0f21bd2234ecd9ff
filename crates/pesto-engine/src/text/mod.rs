//! Font loading and text measurement.

mod font_system;

pub use font_system::{Font, FontId, FontLoadError, FontSystem};
