//! Per-frame session tick
//!
//! Strict order: countdown, power-up timers, spawning, motion, collisions,
//! accounting. Rendering reads the session afterwards.

use glam::Vec2;

use super::collision::{CollisionReport, resolve};
use super::entity::{Behavior, EntityKind, MAGNET_PULL, MAGNET_RADIUS};
use super::state::{PlaySession, SessionPhase};
use crate::consts::*;
use crate::frames;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in screen space (None = pointer outside the window)
    pub pointer_x: Option<f32>,
    /// Idle/demo mode - the autopilot steers
    pub idle_mode: bool,
}

/// Signal for the screen layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The countdown finished this frame
    CountdownFinished,
    /// A terminal collision ended the round
    GameOver,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// The round ended this frame
    pub ended: bool,
    pub transition: Option<Transition>,
    /// Collision outcome (default when collisions were not evaluated)
    pub collisions: CollisionReport,
}

/// Advance the session by `dt_ms`
pub fn tick(state: &mut PlaySession, input: &TickInput, dt_ms: f32) -> TickResult {
    let mut result = TickResult::default();
    if state.is_over() {
        return result;
    }

    let mut input = input.clone();
    if input.idle_mode {
        input.pointer_x = Some(autopilot_target(state));
    }

    state.elapsed_ms += dt_ms;

    if state.phase == SessionPhase::Countdown {
        state.countdown_ms = (state.countdown_ms - dt_ms).max(0.0);
        if state.countdown_ms <= 0.0 {
            state.phase = SessionPhase::Playing;
            result.transition = Some(Transition::CountdownFinished);
            log::info!("Go!");
        }
    }

    // Power-up timers and pickups
    state.powerups.update(dt_ms, &mut state.player.caps);
    if let Some(kind) = state.powerups.roll_pickup(dt_ms, &mut state.rng) {
        let spawned =
            state
                .spawner
                .spawn_power_up(kind, &mut state.field, &mut state.rng, &*state.catalog);
        state.spawner.record(EntityKind::PowerUp, spawned);
    }

    state
        .spawner
        .update(dt_ms, &mut state.field, &mut state.rng, &*state.catalog);

    // Motion
    state.player.update(dt_ms, input.pointer_x);
    let player_pos = state.player.pos;
    let magnet = state.player.caps.magnet_active;
    let pull = MAGNET_PULL * frames(dt_ms);
    for entity in state.field.iter_mut() {
        entity.advance(dt_ms, player_pos.x);
        if magnet
            && entity.behavior == Behavior::Coin
            && entity.pos.distance(player_pos) < MAGNET_RADIUS
        {
            entity.pull_toward(player_pos, pull);
        }
    }
    state.field.retain(|e| !e.is_expired());

    // Collisions and accounting
    if state.phase == SessionPhase::Playing {
        let report = resolve(&state.player, state.invincibility_ms, &mut state.field);

        state.player.score += report.score_delta;
        state.player.coins_collected += report.coins;
        for &kind in &report.power_ups {
            state.powerups.activate(kind);
        }
        state.powerups.apply(&mut state.player.caps);

        for _ in 0..report.summons {
            let spawned = state.spawner.spawn_monster(
                state.player.pos.x,
                &mut state.field,
                &mut state.rng,
                &*state.catalog,
            );
            state.spawner.record(EntityKind::Monster, spawned);
        }

        if report.treasures > 0 {
            log::info!("Treasure collected! score={}", state.player.score);
        }

        if report.ended {
            state.end_round(report.cause);
            result.ended = true;
            result.transition = Some(Transition::GameOver);
        }
        result.collisions = report;
    }

    state.invincibility_ms = (state.invincibility_ms - dt_ms).max(0.0);
    state.theme.update(dt_ms);

    result
}

/// Pointer x the autopilot would choose this frame.
///
/// Sidesteps the closest hazard falling toward the player's column; when the
/// lane is clear it heads for the nearest collectible, otherwise it drifts
/// around the middle of the screen.
pub fn autopilot_target(state: &PlaySession) -> f32 {
    let player = &state.player;
    let half_w = player.size.x / 2.0;
    let lookahead = player.pos.y - SCREEN_HEIGHT * 0.8;

    let hazard = state
        .field
        .iter()
        .filter(|e| {
            matches!(
                e.behavior,
                Behavior::Obstacle | Behavior::Monster { .. } | Behavior::Tree { .. }
            )
        })
        .filter(|e| e.pos.y > lookahead && e.rect().top() < player.rect().bottom())
        .filter(|e| (e.pos.x - player.pos.x).abs() < (e.size.x / 2.0 + half_w + 30.0))
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(hazard) = hazard {
        let rect = hazard.rect();
        let left = rect.left() - half_w - 40.0;
        let right = rect.right() + half_w + 40.0;
        let go_left = if hazard.pos.x >= player.pos.x {
            left >= half_w
        } else {
            right > SCREEN_WIDTH - half_w
        };
        let dodge = if go_left { left } else { right };
        return dodge.clamp(half_w, SCREEN_WIDTH - half_w);
    }

    let collectible = state
        .field
        .iter()
        .filter(|e| {
            matches!(
                e.behavior,
                Behavior::Coin | Behavior::Treasure | Behavior::PowerUp { .. }
            )
        })
        .filter(|e| e.pos.y < player.pos.y && e.pos.y > lookahead)
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player.pos);
            let db = b.pos.distance_squared(player.pos);
            da.total_cmp(&db)
        });

    if let Some(target) = collectible {
        return target.pos.x;
    }

    let t = state.elapsed_ms * 0.001;
    let wander = Vec2::new(t.sin(), (t * 0.7).sin());
    SCREEN_WIDTH / 2.0 + wander.x * 200.0 + wander.y * 80.0
}
