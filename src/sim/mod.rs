//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (entities stay in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod powerups;
pub mod shape;
pub mod spawner;
pub mod state;
pub mod theme;
pub mod tick;

pub use collision::{CollisionReport, resolve};
pub use difficulty::{DifficultyConfig, SessionConfig, SpawnRates};
pub use entity::{Behavior, Entity, EntityKind, Player};
pub use powerups::{Capabilities, PowerUpKind, PowerUpManager};
pub use shape::{Hitbox, OccupancyMask, Rect, coarse_overlap, fine_overlap};
pub use spawner::{SpawnStats, Spawner};
pub use state::{Field, PlaySession, SessionPhase};
pub use theme::{Theme, ThemeCycle};
pub use tick::{TickInput, TickResult, Transition, autopilot_target, tick};
