//! Platform abstraction layer
//!
//! Handles what the host window/terminal hands to the core:
//! - Input events (polled pointer plus a queue of discrete events)
//! - Frame timing

pub mod input;
pub mod time;

pub use input::{FrameInput, InputEvent, Key, MenuAction};
pub use time::FrameLimiter;
