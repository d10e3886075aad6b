//! Day/night theme cycle
//!
//! The simulation only tracks which theme is current and how far through the
//! period it is. When a period ends the theme crossfades for a short while
//! before it flips. Palettes belong to the renderer.

use serde::{Deserialize, Serialize};

/// How long each theme lasts before switching (ms)
pub const THEME_PERIOD_MS: f32 = 30_000.0;
/// Crossfade between themes once a period ends (ms)
pub const THEME_TRANSITION_MS: f32 = 2_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeCycle {
    pub theme: Theme,
    elapsed_ms: f32,
    period_ms: f32,
    /// Time into the running crossfade, None when idle
    transition_ms: Option<f32>,
}

impl Default for ThemeCycle {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            elapsed_ms: 0.0,
            period_ms: THEME_PERIOD_MS,
            transition_ms: None,
        }
    }
}

impl ThemeCycle {
    /// Advance the cycle. Returns true when the theme switched.
    ///
    /// The period timer keeps running during a crossfade, so the next
    /// period starts counting as soon as the previous one fires.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= self.period_ms {
            self.elapsed_ms = 0.0;
            if self.transition_ms.is_none() {
                self.transition_ms = Some(0.0);
                log::debug!("Theme transition from {:?} started", self.theme);
            }
        }

        let Some(transition_ms) = &mut self.transition_ms else {
            return false;
        };
        *transition_ms += dt_ms;
        if *transition_ms < THEME_TRANSITION_MS {
            return false;
        }
        self.transition_ms = None;
        self.theme = self.theme.toggled();
        log::debug!("Theme switched to {:?}", self.theme);
        true
    }

    /// Fraction of the current period already elapsed (0.0 - 1.0)
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms / self.period_ms).clamp(0.0, 1.0)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition_ms.is_some()
    }

    /// Crossfade progress toward the other theme (0.0 when idle)
    pub fn transition_progress(&self) -> f32 {
        self.transition_ms
            .map(|ms| (ms / THEME_TRANSITION_MS).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}
