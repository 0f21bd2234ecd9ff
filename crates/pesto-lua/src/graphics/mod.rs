//! `pesto.graphics`.

mod bindings;
mod state;

pub(crate) use bindings::create_table;
pub use state::{DrawState, Pass};
