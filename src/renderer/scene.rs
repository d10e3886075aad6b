//! Scene extraction
//!
//! Flattens a session into draw commands. Items are ordered back to front:
//! entities in spawn order, then the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::SpriteId;
use crate::sim::{EntityKind, PlaySession, Theme};

/// Blink period of the player while continue invincibility runs (ms)
const BLINK_MS: f32 = 100.0;

/// One "draw this sprite here" command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub kind: EntityKind,
    pub center: Vec2,
    /// Drawn size (already includes pulse scaling)
    pub size: Vec2,
    /// Degrees, clockwise
    pub rotation: f32,
    pub alpha: f32,
    /// None only for pickups, which are drawn procedurally
    pub sprite: Option<SpriteId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub theme: Theme,
    /// Blend toward `theme.toggled()` (0.0 = none)
    pub theme_transition: f32,
    pub items: Vec<RenderItem>,
}

/// Build this frame's draw list
pub fn build_scene(session: &PlaySession) -> Scene {
    let mut items = Vec::with_capacity(session.field.len() + 1);

    for entity in session.field.iter() {
        // Missing art: nothing to draw
        if entity.sprite.is_none() && entity.kind() != EntityKind::PowerUp {
            continue;
        }
        items.push(RenderItem {
            kind: entity.kind(),
            center: entity.pos,
            size: entity.size * entity.scale(),
            rotation: entity.rotation(),
            alpha: 1.0,
            sprite: entity.sprite,
        });
    }

    let player = &session.player;
    if player.sprite.is_some() {
        items.push(RenderItem {
            kind: EntityKind::Player,
            center: player.pos,
            size: player.size,
            rotation: player.rotation,
            alpha: player_alpha(session.invincibility_ms),
            sprite: player.sprite,
        });
    }

    Scene {
        theme: session.theme.theme,
        theme_transition: session.theme.transition_progress(),
        items,
    }
}

/// The player flickers while continue invincibility runs
fn player_alpha(invincibility_ms: f32) -> f32 {
    if invincibility_ms <= 0.0 {
        return 1.0;
    }
    if ((invincibility_ms / BLINK_MS) as u32) % 2 == 0 {
        1.0
    } else {
        0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{SpriteCatalog, SpriteSheet};
    use crate::settings::Difficulty;
    use crate::sim::theme::{THEME_PERIOD_MS, THEME_TRANSITION_MS};
    use crate::sim::{Behavior, Entity, PowerUpKind, SessionConfig};
    use std::sync::Arc;

    fn session() -> PlaySession {
        PlaySession::new(
            SessionConfig::new(Difficulty::Easy, 1),
            Arc::new(SpriteSheet::placeholder()),
        )
    }

    #[test]
    fn test_scene_order_and_omissions() {
        let mut session = session();
        let sheet = SpriteSheet::placeholder();
        let rock = &sheet.sprites(EntityKind::Obstacle)[0];
        session.field.insert(
            Entity::new(0, Behavior::Obstacle, Vec2::ZERO, Vec2::splat(200.0), 0.0)
                .with_sprite(rock),
        );
        // No sprite and not a pickup: omitted
        session
            .field
            .insert(Entity::new(0, Behavior::Coin, Vec2::ZERO, Vec2::splat(64.0), 0.0));
        session.field.insert(Entity::new(
            0,
            Behavior::PowerUp {
                kind: PowerUpKind::Shield,
                spin: 45.0,
                pulse: std::f32::consts::FRAC_PI_2,
            },
            Vec2::ZERO,
            Vec2::splat(80.0),
            0.0,
        ));

        let scene = build_scene(&session);
        let kinds: Vec<EntityKind> = scene.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Obstacle, EntityKind::PowerUp, EntityKind::Player]
        );
        let pickup = scene.items[1];
        assert_eq!(pickup.rotation, 45.0);
        assert!((pickup.size.x - 88.0).abs() < 1e-3);
        assert_eq!(scene.theme, Theme::Light);
        assert_eq!(scene.theme_transition, 0.0);
    }

    #[test]
    fn test_scene_carries_theme_crossfade() {
        let mut session = session();
        session.theme.update(THEME_PERIOD_MS - 1.0);
        session.theme.update(1.0);
        session.theme.update(THEME_TRANSITION_MS / 2.0 - 1.0);
        let scene = build_scene(&session);
        assert_eq!(scene.theme, Theme::Light);
        assert!((scene.theme_transition - 0.5).abs() < 1e-6);

        session.theme.update(THEME_TRANSITION_MS / 2.0);
        let scene = build_scene(&session);
        assert_eq!(scene.theme, Theme::Dark);
        assert_eq!(scene.theme_transition, 0.0);
    }

    #[test]
    fn test_player_blinks_while_invincible() {
        assert_eq!(player_alpha(0.0), 1.0);
        assert_eq!(player_alpha(2_850.0), 1.0);
        assert_eq!(player_alpha(2_950.0), 0.4);
    }
}
