//! `pesto.filesystem`.
//!
//! [`ops`] holds the native calls with their failure policy applied; nothing
//! in there raises. `bindings` only marshals arguments and results.

mod bindings;
pub mod ops;
pub mod pattern;

pub(crate) use bindings::create_table;
pub use pattern::Filter;
