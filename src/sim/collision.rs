//! Per-frame collision resolution
//!
//! Player/entity interactions are applied in a fixed precedence:
//! 1. coins (and treasure chests) are collected
//! 2. power-up pickups are collected
//! 3. while invincible, obstacle and monster contact is ignored
//! 4. obstacle contact ends the round and stops resolution
//! 5. first contact with a tree summons a monster
//! 6. monster contact ends the round
//! 7. monsters touching obstacles are destroyed
//!
//! Resolution mutates only the entity field; everything the session has to
//! apply (score, pickups, summons) comes back in the report.

use super::entity::{Behavior, EntityKind, Player};
use super::powerups::PowerUpKind;
use super::shape::fine_overlap;
use super::state::Field;
use crate::consts::{COIN_SCORE, TREASURE_SCORE};

/// Outcome of one frame of collision resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// The round ended this frame
    pub ended: bool,
    /// What ended it
    pub cause: Option<EntityKind>,
    pub score_delta: u64,
    pub coins: u32,
    pub treasures: u32,
    /// Pickups collected, in field order
    pub power_ups: Vec<PowerUpKind>,
    /// Trees armed this frame; each asks for one monster near the player
    pub summons: u32,
    pub monsters_destroyed: u32,
}

/// Score for one coin at the given multiplier
#[inline]
pub fn coin_score(multiplier: f32) -> u64 {
    (COIN_SCORE as f32 * multiplier).round() as u64
}

/// Resolve every interaction for this frame.
///
/// `invincibility_ms` is the continue grace timer; the shield capability on
/// the player counts as well.
pub fn resolve(player: &Player, invincibility_ms: f32, field: &mut Field) -> CollisionReport {
    let mut report = CollisionReport::default();
    let hitbox = player.hitbox();
    let multiplier = player.caps.score_multiplier;

    // 1. Coins and treasure
    field.retain(|e| {
        if !matches!(e.behavior, Behavior::Coin | Behavior::Treasure) {
            return true;
        }
        if !fine_overlap(&hitbox, &e.hitbox()) {
            return true;
        }
        if let Behavior::Coin = e.behavior {
            report.coins += 1;
            report.score_delta += coin_score(multiplier);
        } else {
            // Chest bonus ignores the score multiplier
            report.treasures += 1;
            report.score_delta += TREASURE_SCORE;
        }
        false
    });

    // 2. Power-up pickups
    field.retain(|e| match e.behavior {
        Behavior::PowerUp { kind, .. } if fine_overlap(&hitbox, &e.hitbox()) => {
            report.power_ups.push(kind);
            false
        }
        _ => true,
    });

    // 3. Invincibility
    let invincible = invincibility_ms > 0.0 || player.caps.invincible;

    // 4. Obstacles
    if !invincible
        && field
            .iter()
            .filter(|e| e.kind() == EntityKind::Obstacle)
            .any(|e| fine_overlap(&hitbox, &e.hitbox()))
    {
        report.ended = true;
        report.cause = Some(EntityKind::Obstacle);
        return report;
    }

    // 5. Trees (evaluated even while invincible)
    for entity in field.iter_mut() {
        if !matches!(entity.behavior, Behavior::Tree { called_monster: false }) {
            continue;
        }
        if fine_overlap(&hitbox, &entity.hitbox()) {
            entity.behavior = Behavior::Tree {
                called_monster: true,
            };
            report.summons += 1;
        }
    }

    // 6. Monsters
    if !invincible
        && field
            .iter()
            .filter(|e| e.kind() == EntityKind::Monster)
            .any(|e| fine_overlap(&hitbox, &e.hitbox()))
    {
        report.ended = true;
        report.cause = Some(EntityKind::Monster);
    }

    // 7. Obstacles destroy monsters
    let doomed: Vec<u32> = field
        .iter()
        .filter(|m| m.kind() == EntityKind::Monster)
        .filter(|m| {
            field
                .iter()
                .filter(|o| o.kind() == EntityKind::Obstacle)
                .any(|o| fine_overlap(&m.hitbox(), &o.hitbox()))
        })
        .map(|m| m.id)
        .collect();
    if !doomed.is_empty() {
        report.monsters_destroyed = doomed.len() as u32;
        field.retain(|e| !doomed.contains(&e.id));
        log::debug!("{} monster(s) crushed by obstacles", doomed.len());
    }

    report
}
