//! Difficulty table
//!
//! Speeds are in pixels per reference frame (60 Hz); spawn rates are expected
//! spawns per second.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Per-second spawn probabilities for the probability-driven kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRates {
    pub obstacle_group: f32,
    pub single_obstacle: f32,
    pub coin: f32,
    pub tree: f32,
}

/// Immutable speed/rate bundle for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub obstacle_speed: f32,
    pub coin_speed: f32,
    pub tree_speed: f32,
    pub treasure_speed: f32,
    pub monster_speed: f32,
    pub spawn_rates: SpawnRates,
}

impl DifficultyConfig {
    pub const EASY: DifficultyConfig = DifficultyConfig {
        obstacle_speed: 6.0,
        coin_speed: 6.0,
        tree_speed: 6.0,
        treasure_speed: 5.0,
        monster_speed: 6.0,
        spawn_rates: SpawnRates {
            obstacle_group: 0.4,
            single_obstacle: 0.8,
            coin: 5.0,
            tree: 0.7,
        },
    };

    pub const MEDIUM: DifficultyConfig = DifficultyConfig {
        obstacle_speed: 8.0,
        coin_speed: 8.0,
        tree_speed: 8.0,
        treasure_speed: 7.0,
        monster_speed: 8.0,
        spawn_rates: SpawnRates {
            obstacle_group: 0.6,
            single_obstacle: 1.2,
            coin: 4.0,
            tree: 1.0,
        },
    };

    pub const HARD: DifficultyConfig = DifficultyConfig {
        obstacle_speed: 11.0,
        coin_speed: 11.0,
        tree_speed: 11.0,
        treasure_speed: 10.0,
        monster_speed: 11.0,
        spawn_rates: SpawnRates {
            obstacle_group: 0.9,
            single_obstacle: 1.8,
            coin: 3.5,
            tree: 1.4,
        },
    };

    pub fn for_tier(tier: Difficulty) -> Self {
        match tier {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

/// Everything a play session reads from configuration, captured once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub tuning: DifficultyConfig,
    /// Run seed for reproducibility
    pub seed: u64,
}

impl SessionConfig {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            tuning: DifficultyConfig::for_tier(difficulty),
            seed,
        }
    }
}
