//! Timed power-up effects
//!
//! Each kind is either inactive or active with a remaining duration. Picking
//! up an active kind refreshes its timer to the full duration; effects never
//! stack. Player capabilities are a pure projection of the active set and are
//! recomputed every frame.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::POWER_UP_INTERVAL_MS;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Shield,
    SpeedBoost,
    Magnet,
    DoubleScore,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Magnet,
        PowerUpKind::DoubleScore,
    ];

    /// Full effect duration (ms)
    pub fn duration_ms(&self) -> f32 {
        match self {
            PowerUpKind::Shield => 10_000.0,
            PowerUpKind::SpeedBoost => 8_000.0,
            PowerUpKind::Magnet => 12_000.0,
            PowerUpKind::DoubleScore => 15_000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::SpeedBoost => "speed_boost",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::DoubleScore => "double_score",
        }
    }
}

/// Player capability flags derived from active power-ups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub invincible: bool,
    pub speed_multiplier: f32,
    pub magnet_active: bool,
    pub score_multiplier: f32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            invincible: false,
            speed_multiplier: 1.0,
            magnet_active: false,
            score_multiplier: 1.0,
        }
    }
}

/// Tracks active effects and the pickup spawn timer
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    /// Remaining duration per active kind (ms)
    active: BTreeMap<PowerUpKind, f32>,
    /// Time since the last pickup spawned (ms)
    spawn_timer_ms: f32,
    spawn_interval_ms: f32,
}

impl Default for PowerUpManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self {
            active: BTreeMap::new(),
            spawn_timer_ms: 0.0,
            spawn_interval_ms: POWER_UP_INTERVAL_MS,
        }
    }

    /// Start an effect, or refresh it to full duration if already running
    pub fn activate(&mut self, kind: PowerUpKind) {
        let refreshed = self.active.insert(kind, kind.duration_ms()).is_some();
        log::debug!(
            "Power-up {} {}",
            kind.as_str(),
            if refreshed { "refreshed" } else { "activated" }
        );
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Remaining time for a kind (0 when inactive)
    pub fn remaining_ms(&self, kind: PowerUpKind) -> f32 {
        self.active.get(&kind).copied().unwrap_or(0.0)
    }

    /// Active kinds with remaining time, in stable kind order
    pub fn active(&self) -> impl Iterator<Item = (PowerUpKind, f32)> + '_ {
        self.active.iter().map(|(&kind, &ms)| (kind, ms))
    }

    /// Count down every active effect, retract expired ones, then project
    /// the remaining set onto `caps`. Returns the kinds that expired.
    pub fn update(&mut self, dt_ms: f32, caps: &mut Capabilities) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for (&kind, remaining) in self.active.iter_mut() {
            *remaining -= dt_ms;
            if *remaining <= 0.0 {
                expired.push(kind);
            }
        }
        for kind in &expired {
            self.active.remove(kind);
            log::debug!("Power-up {} expired", kind.as_str());
        }
        self.apply(caps);
        expired
    }

    /// Recompute capability flags from the active set (idempotent)
    pub fn apply(&self, caps: &mut Capabilities) {
        caps.invincible = self.is_active(PowerUpKind::Shield);
        caps.speed_multiplier = if self.is_active(PowerUpKind::SpeedBoost) {
            1.5
        } else {
            1.0
        };
        caps.magnet_active = self.is_active(PowerUpKind::Magnet);
        caps.score_multiplier = if self.is_active(PowerUpKind::DoubleScore) {
            2.0
        } else {
            1.0
        };
    }

    /// Advance the pickup timer; when the interval has elapsed, choose a kind
    /// uniformly and restart the timer.
    pub fn roll_pickup<R: Rng>(&mut self, dt_ms: f32, rng: &mut R) -> Option<PowerUpKind> {
        self.spawn_timer_ms += dt_ms;
        if self.spawn_timer_ms < self.spawn_interval_ms {
            return None;
        }
        self.spawn_timer_ms = 0.0;
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        Some(kind)
    }
}
