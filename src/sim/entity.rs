//! Entity model
//!
//! Every moving object is an `Entity` whose `Behavior` variant selects its
//! motion and expiry rule. The player is a separate type because it is driven
//! by input rather than by falling.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerups::{Capabilities, PowerUpKind};
use super::shape::{Hitbox, OccupancyMask, Rect};
use crate::assets::{Sprite, SpriteId};
use crate::consts::*;
use crate::frames;

/// Entity kinds (tag only, no per-instance state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Obstacle,
    Coin,
    Treasure,
    Tree,
    Monster,
    PowerUp,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Player,
        EntityKind::Obstacle,
        EntityKind::Coin,
        EntityKind::Treasure,
        EntityKind::Tree,
        EntityKind::Monster,
        EntityKind::PowerUp,
    ];
}

/// Monsters give up the chase after this long (ms)
pub const MONSTER_LIFETIME_MS: f32 = 60_000.0;
/// Maximum horizontal monster steering per frame (px)
pub const MONSTER_MAX_STEER: f32 = 6.0;
/// Coins inside this radius drift toward a magnetized player (px)
pub const MAGNET_RADIUS: f32 = 150.0;
/// Magnet drift per frame (px)
pub const MAGNET_PULL: f32 = 10.0;

/// Per-kind state and behavior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Obstacle,
    Coin,
    Treasure,
    Tree {
        /// One-shot summon flag, set on first player contact
        called_monster: bool,
    },
    Monster {
        age_ms: f32,
    },
    PowerUp {
        kind: PowerUpKind,
        /// Spin angle (degrees)
        spin: f32,
        /// Pulse phase (radians)
        pulse: f32,
    },
}

impl Behavior {
    pub fn kind(&self) -> EntityKind {
        match self {
            Behavior::Obstacle => EntityKind::Obstacle,
            Behavior::Coin => EntityKind::Coin,
            Behavior::Treasure => EntityKind::Treasure,
            Behavior::Tree { .. } => EntityKind::Tree,
            Behavior::Monster { .. } => EntityKind::Monster,
            Behavior::PowerUp { .. } => EntityKind::PowerUp,
        }
    }

    /// Extra distance below the screen before the entity is discarded
    fn expiry_margin(&self) -> f32 {
        match self {
            Behavior::Coin => 20.0,
            Behavior::Monster { .. } => 200.0,
            _ => 50.0,
        }
    }
}

/// A spawned, falling object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub behavior: Behavior,
    /// Center position (screen space, y grows downward)
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed (px per reference frame)
    pub speed: f32,
    pub sprite: Option<SpriteId>,
    pub mask: Option<Arc<OccupancyMask>>,
}

impl Entity {
    pub fn new(id: u32, behavior: Behavior, pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            behavior,
            pos,
            size,
            speed,
            sprite: None,
            mask: None,
        }
    }

    /// Attach a sprite handle and its mask
    pub fn with_sprite(mut self, sprite: &Sprite) -> Self {
        self.sprite = Some(sprite.id);
        self.mask = sprite.mask.clone();
        self
    }

    pub fn with_mask(mut self, mask: OccupancyMask) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.behavior.kind()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::new(self.rect(), self.mask.as_deref())
    }

    /// Advance by `dt_ms`. Monsters steer toward `player_x`.
    pub fn advance(&mut self, dt_ms: f32, player_x: f32) {
        let f = frames(dt_ms);
        self.pos.y += self.speed * f;

        match &mut self.behavior {
            Behavior::Monster { age_ms } => {
                *age_ms += dt_ms;
                let dx = player_x - self.pos.x;
                if dx != 0.0 {
                    let steer = ((dx.abs() / 8.0).floor() + 1.0).min(MONSTER_MAX_STEER) * f;
                    self.pos.x += dx.signum() * steer.min(dx.abs());
                }
            }
            Behavior::PowerUp { spin, pulse, .. } => {
                *spin = (*spin + dt_ms * 0.1) % 360.0;
                *pulse += dt_ms * 0.005;
            }
            _ => {}
        }
    }

    /// Whether the entity should be removed from the active set
    pub fn is_expired(&self) -> bool {
        let too_old = match self.behavior {
            Behavior::Monster { age_ms } => age_ms > MONSTER_LIFETIME_MS,
            _ => false,
        };
        too_old || self.rect().top() > SCREEN_HEIGHT + self.behavior.expiry_margin()
    }

    /// Move up to `step` px toward `target`
    pub fn pull_toward(&mut self, target: Vec2, step: f32) {
        let delta = target - self.pos;
        let dist = delta.length();
        if dist <= step {
            self.pos = target;
        } else if dist > 0.0 {
            self.pos += delta / dist * step;
        }
    }

    /// Render rotation (degrees)
    pub fn rotation(&self) -> f32 {
        match self.behavior {
            Behavior::PowerUp { spin, .. } => spin,
            _ => 0.0,
        }
    }

    /// Render scale factor (pickups pulse)
    pub fn scale(&self) -> f32 {
        match self.behavior {
            Behavior::PowerUp { pulse, .. } => 1.0 + 0.1 * pulse.sin(),
            _ => 1.0,
        }
    }
}

/// Player spawn point above the screen
pub const PLAYER_START: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, -200.0);
pub const PLAYER_SIZE: Vec2 = Vec2::new(140.0, 140.0);
/// Entry descent speed (px per frame)
pub const PLAYER_DROP_SPEED: f32 = 8.0;
/// Fraction of the remaining pointer distance covered per frame
pub const PLAYER_FOLLOW_RATE: f32 = 0.12;

/// The surfer
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Resting height once the entry descent ends
    pub target_y: f32,
    /// False while descending into view; pointer input is ignored
    pub active: bool,
    /// Sway animation clock (ms)
    pub sway_ms: f32,
    /// Sway rotation (degrees); turns the hitbox as well as the sprite
    pub rotation: f32,
    pub score: u64,
    pub coins_collected: u32,
    /// Written only by `PowerUpManager::apply`
    pub caps: Capabilities,
    pub sprite: Option<SpriteId>,
    pub mask: Option<Arc<OccupancyMask>>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            size: PLAYER_SIZE,
            target_y: SCREEN_HEIGHT * 0.62,
            active: false,
            sway_ms: 0.0,
            rotation: 0.0,
            score: 0,
            coins_collected: 0,
            caps: Capabilities::default(),
            sprite: None,
            mask: None,
        }
    }
}

impl Player {
    pub fn new(sprite: Option<&Sprite>) -> Self {
        let mut player = Self::default();
        if let Some(sprite) = sprite {
            player.sprite = Some(sprite.id);
            player.mask = sprite.mask.clone();
        }
        player
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Collision shape, swaying with the sprite
    pub fn hitbox(&self) -> Hitbox<'_> {
        Hitbox::rotated(self.rect(), self.mask.as_deref(), self.rotation)
    }

    /// Descend into view, then follow the pointer horizontally
    pub fn update(&mut self, dt_ms: f32, pointer_x: Option<f32>) {
        let f = frames(dt_ms);

        if !self.active {
            self.pos.y = (self.pos.y + PLAYER_DROP_SPEED * f).min(self.target_y);
            if self.pos.y >= self.target_y {
                self.active = true;
            }
            return;
        }

        if let Some(mx) = pointer_x {
            // Frame-rate independent form of "cover `rate` of the gap per frame"
            let rate = (PLAYER_FOLLOW_RATE * self.caps.speed_multiplier).min(1.0);
            let k = 1.0 - (1.0 - rate).powf(f);
            self.pos.x += (mx - self.pos.x) * k;
        }

        let half_w = self.size.x / 2.0;
        self.pos.x = self.pos.x.clamp(half_w, SCREEN_WIDTH - half_w);

        self.sway_ms += dt_ms;
        self.rotation = (self.sway_ms * 0.005).sin() * 8.0;
    }
}
