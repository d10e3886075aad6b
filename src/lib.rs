//! Surf Dash - A vertically scrolling surf-descent arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, power-ups, session tick)
//! - `screens`: Screen state machine (start, settings, play, game over)
//! - `renderer`: Render handoff (what to draw, never how)
//! - `ui`: HUD snapshots for the UI collaborator
//! - `platform`: Input events and frame timing
//! - `assets`: Sprite catalog seam (images/masks are loaded elsewhere)

pub mod assets;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod screens;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, ContinueError, SpawnError};
pub use screens::{Flow, Screen, ScreenStateMachine};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical screen size (pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Target frame rate of the outer loop
    pub const TARGET_FPS: u32 = 60;
    /// Duration of one frame at the target rate (ms)
    pub const FRAME_MS: f32 = 1000.0 / TARGET_FPS as f32;

    /// Probability spawns are suppressed this long after session start (ms)
    pub const SPAWN_GRACE_MS: f32 = 2_000.0;
    /// Collisions are not evaluated until this countdown finishes (ms)
    pub const COUNTDOWN_MS: f32 = 3_000.0;
    /// Invincibility granted by a continue (ms)
    pub const CONTINUE_GRACE_MS: f32 = 3_000.0;
    /// Maximum continues per session
    pub const MAX_CONTINUES: u8 = 2;

    /// Treasure chest interval (ms)
    pub const TREASURE_INTERVAL_MS: f32 = 120_000.0;
    /// Power-up pickup interval (ms)
    pub const POWER_UP_INTERVAL_MS: f32 = 20_000.0;

    /// Score per coin (before multiplier)
    pub const COIN_SCORE: u64 = 5;
    /// Score per treasure chest (never multiplied)
    pub const TREASURE_SCORE: u64 = 50;
}

/// Number of reference frames (at the target FPS) covered by `dt_ms`.
///
/// Motion constants are expressed in pixels per reference frame.
#[inline]
pub fn frames(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}
