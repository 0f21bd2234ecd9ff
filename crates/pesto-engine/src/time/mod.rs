//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`
//! - `FrameTime::dt` of the last tick is what scripts read through `getDelta`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
