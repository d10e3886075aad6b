//! Error taxonomy
//!
//! Configuration errors fail fast at read time. Everything raised inside the
//! simulation is recoverable and handled where it occurs.

use thiserror::Error;

use crate::sim::EntityKind;

/// Invalid configuration, raised when settings are read
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty tier '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),
    #[error("volume {0} is outside 0.0..=1.0")]
    VolumeOutOfRange(f32),
    #[error("could not parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A continue request that cannot be honored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContinueError {
    #[error("no continues left ({used}/{max} used)")]
    LimitReached { used: u8, max: u8 },
    #[error("continue is only available after a game over")]
    NotGameOver,
}

/// A dropped spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no sprite available for {0:?}")]
    ResourceUnavailable(EntityKind),
    #[error("could not place {kind:?} after {attempts} attempts")]
    PlacementExhausted { kind: EntityKind, attempts: u32 },
}
