//! Time subsystem.
//!
//! Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`
//! - drive animation from `FrameTime::elapsed`, simulation steps from `dt`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
