//! Render handoff
//!
//! The core decides what is drawn where; the host renderer owns images,
//! palettes and the GPU.

pub mod scene;

pub use scene::{RenderItem, Scene, build_scene};
