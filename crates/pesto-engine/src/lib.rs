//! Pesto engine crate.
//!
//! This crate is the native host behind the scripting bridge: it owns the
//! platform + GPU runtime, the recorded draw stream, texture bookkeeping and
//! fonts. Nothing in here knows about Lua.

pub mod device;
pub mod window;
pub mod time;
pub mod core;
pub mod host;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod resources;
pub mod scene;
pub mod text;
