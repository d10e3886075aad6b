//! Session state
//!
//! Everything one play session owns lives here: the entity field, the player,
//! timers and the seeded RNG. A continue keeps the whole session; a restart
//! builds a new one.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::SessionConfig;
use super::entity::{Entity, EntityKind, Player};
use super::powerups::PowerUpManager;
use super::shape::Rect;
use super::spawner::Spawner;
use super::theme::ThemeCycle;
use crate::assets::SpriteCatalog;
use crate::consts::*;
use crate::error::ContinueError;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Pre-round countdown; everything moves but nothing collides
    Countdown,
    /// Active gameplay
    Playing,
    /// Round ended, waiting for restart/continue
    GameOver,
}

/// Active entities, kept in spawn (id) order
#[derive(Debug, Clone)]
pub struct Field {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }
}

impl Field {
    /// Add an entity, assigning it a fresh id
    pub fn insert(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn retain<F: FnMut(&Entity) -> bool>(&mut self, f: F) {
        self.entities.retain(f);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    /// Whether `rect` overlaps any obstacle or tree (spawn placement check)
    pub fn blocks(&self, rect: &Rect) -> bool {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind(), EntityKind::Obstacle | EntityKind::Tree))
            .any(|e| e.rect().overlaps(rect))
    }
}

/// One play session (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct PlaySession {
    pub config: SessionConfig,
    pub phase: SessionPhase,
    pub player: Player,
    pub field: Field,
    pub spawner: Spawner,
    pub powerups: PowerUpManager,
    pub theme: ThemeCycle,
    pub rng: Pcg32,
    pub catalog: Arc<dyn SpriteCatalog>,
    /// Simulated time since the session started (ms)
    pub elapsed_ms: f32,
    /// Remaining pre-round countdown (ms)
    pub countdown_ms: f32,
    /// Remaining continue invincibility (ms, 0 = inactive)
    pub invincibility_ms: f32,
    pub continue_count: u8,
    /// What ended the last round
    pub ended_by: Option<EntityKind>,
}

impl PlaySession {
    pub fn new(config: SessionConfig, catalog: Arc<dyn SpriteCatalog>) -> Self {
        let player = Player::new(catalog.sprites(EntityKind::Player).first());
        log::info!(
            "New session: difficulty={}, seed={}",
            config.difficulty,
            config.seed
        );
        Self {
            config,
            phase: SessionPhase::Countdown,
            player,
            field: Field::default(),
            spawner: Spawner::new(config.tuning),
            powerups: PowerUpManager::new(),
            theme: ThemeCycle::default(),
            rng: Pcg32::seed_from_u64(config.seed),
            catalog,
            elapsed_ms: 0.0,
            countdown_ms: COUNTDOWN_MS,
            invincibility_ms: 0.0,
            continue_count: 0,
            ended_by: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn continues_left(&self) -> u8 {
        MAX_CONTINUES.saturating_sub(self.continue_count)
    }

    /// Resume the same round with temporary invincibility.
    ///
    /// Score, entities and power-ups are kept.
    pub fn continue_round(&mut self) -> Result<(), ContinueError> {
        if !self.is_over() {
            return Err(ContinueError::NotGameOver);
        }
        if self.continue_count >= MAX_CONTINUES {
            return Err(ContinueError::LimitReached {
                used: self.continue_count,
                max: MAX_CONTINUES,
            });
        }
        self.continue_count += 1;
        self.invincibility_ms = CONTINUE_GRACE_MS;
        self.phase = SessionPhase::Playing;
        self.ended_by = None;
        log::info!(
            "Continue {}/{} (score {})",
            self.continue_count,
            MAX_CONTINUES,
            self.player.score
        );
        Ok(())
    }

    /// End the round (terminal collision)
    pub fn end_round(&mut self, cause: Option<EntityKind>) {
        self.phase = SessionPhase::GameOver;
        self.ended_by = cause;
        log::info!(
            "Round over ({:?}): score={}, coins={}",
            cause,
            self.player.score,
            self.player.coins_collected
        );
    }
}
