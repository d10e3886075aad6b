//! HUD data for the UI collaborator
//!
//! The core only reports values; fonts, layout and colors live outside.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;
use crate::sim::{PlaySession, PowerUpKind, SessionPhase, Theme};

/// How long a transient notice stays up (ms)
pub const NOTICE_MS: f32 = 2_000.0;

/// Short message shown over the current screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub remaining_ms: f32,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            remaining_ms: NOTICE_MS,
        }
    }

    /// Count down; returns false once the notice should disappear
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        self.remaining_ms > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: f32,
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub coins: u32,
    /// Remaining continue invincibility (ms, 0 = none)
    pub invincibility_ms: f32,
    pub power_ups: Vec<ActivePowerUp>,
    pub difficulty: Difficulty,
    pub theme: Theme,
    /// Fraction of the current theme period elapsed
    pub theme_progress: f32,
    /// Crossfade toward the other theme (0.0 when idle)
    pub theme_transition: f32,
    /// Whole seconds left on the pre-round countdown
    pub countdown: Option<u32>,
    pub continues_left: u8,
    pub notice: Option<String>,
}

impl HudSnapshot {
    pub fn from_session(session: &PlaySession, notice: Option<&Notice>) -> Self {
        let countdown = (session.phase == SessionPhase::Countdown)
            .then(|| (session.countdown_ms / 1000.0).ceil() as u32);
        Self {
            score: session.player.score,
            coins: session.player.coins_collected,
            invincibility_ms: session.invincibility_ms,
            power_ups: session
                .powerups
                .active()
                .map(|(kind, remaining_ms)| ActivePowerUp { kind, remaining_ms })
                .collect(),
            difficulty: session.config.difficulty,
            theme: session.theme.theme,
            theme_progress: session.theme.progress(),
            theme_transition: session.theme.transition_progress(),
            countdown,
            continues_left: session.continues_left(),
            notice: notice.map(|n| n.text.clone()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use crate::sim::SessionConfig;
    use crate::sim::theme::{THEME_PERIOD_MS, THEME_TRANSITION_MS};
    use std::sync::Arc;

    #[test]
    fn test_snapshot_reports_session() {
        let mut session = PlaySession::new(
            SessionConfig::new(Difficulty::Hard, 3),
            Arc::new(SpriteSheet::placeholder()),
        );
        session.powerups.activate(PowerUpKind::Magnet);
        session.player.score = 25;
        session.countdown_ms = 2_100.0;

        let notice = Notice::new("No continues left");
        let hud = HudSnapshot::from_session(&session, Some(&notice));
        assert_eq!(hud.score, 25);
        assert_eq!(hud.difficulty, Difficulty::Hard);
        assert_eq!(hud.countdown, Some(3));
        assert_eq!(hud.continues_left, 2);
        assert_eq!(
            hud.power_ups,
            vec![ActivePowerUp {
                kind: PowerUpKind::Magnet,
                remaining_ms: 12_000.0
            }]
        );
        assert_eq!(hud.notice.as_deref(), Some("No continues left"));
        assert_eq!(hud.theme_transition, 0.0);

        let json = hud.to_json().unwrap();
        assert!(json.contains("\"magnet\""));
        assert!(json.contains("\"hard\""));
    }

    #[test]
    fn test_snapshot_reports_theme_crossfade() {
        let mut session = PlaySession::new(
            SessionConfig::new(Difficulty::Easy, 3),
            Arc::new(SpriteSheet::placeholder()),
        );
        session.theme.update(THEME_PERIOD_MS - 1.0);
        // The frame that ends the period also starts the crossfade
        session.theme.update(1.0);
        session.theme.update(THEME_TRANSITION_MS / 4.0 - 1.0);
        let hud = HudSnapshot::from_session(&session, None);
        assert_eq!(hud.theme, Theme::Light);
        assert!((hud.theme_transition - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_notice_expires() {
        let mut notice = Notice::new("hi");
        assert!(notice.update(NOTICE_MS - 1.0));
        assert!(!notice.update(1.0));
    }
}
