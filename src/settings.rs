//! Game settings and preferences
//!
//! Held in memory for the lifetime of the process. The settings screen edits a
//! draft and commits it here when the player leaves; each play session takes
//! its own `SessionConfig` snapshot and never sees later edits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::difficulty::SessionConfig;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Process-wide game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0), forwarded to the audio collaborator
    pub volume: f32,
    /// Tier used for the next play session
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            difficulty: Difficulty::Medium,
        }
    }
}

/// Wire shape accepted by `Settings::from_json`; validated before use.
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default)]
    volume: Option<f32>,
    #[serde(default)]
    difficulty: Option<String>,
}

impl Settings {
    /// Parse settings handed over by the bootstrap collaborator.
    ///
    /// Missing fields take their defaults; present but invalid fields are
    /// rejected rather than replaced.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(json)?;
        let defaults = Self::default();

        let volume = raw.volume.unwrap_or(defaults.volume);
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::VolumeOutOfRange(volume));
        }

        let difficulty = match raw.difficulty {
            Some(name) => name.parse()?,
            None => defaults.difficulty,
        };

        Ok(Self { volume, difficulty })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set volume from a slider position, clamped to 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Snapshot for a new play session
    pub fn session_config(&self, seed: u64) -> SessionConfig {
        SessionConfig::new(self.difficulty, seed)
    }
}
