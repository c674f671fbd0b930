//! Platform abstraction layer
//!
//! Renderer-agnostic glue for:
//! - Time (monotonic frame timestamps)
//! - Input events (key/mouse to frame requests)

pub mod input;
pub mod time;

pub use input::{InputEvent, InputState};
pub use time::{FrameClock, FrameTick, FrameTimer, ManualClock, SystemClock};
