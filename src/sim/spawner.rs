//! Procedural entity spawning
//!
//! Obstacles, coins and trees spawn as Bernoulli trials per frame: a kind with
//! rate `r` (spawns/second) spawns with probability `r * dt`, so density does
//! not depend on frame rate. Treasure runs on a fixed interval timer and
//! monsters only appear when a tree is touched. Every spawn attempt either
//! lands in a free spot or is dropped; nothing is ever force-placed into an
//! overlap.

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use super::difficulty::DifficultyConfig;
use super::entity::{Behavior, Entity, EntityKind};
use super::powerups::PowerUpKind;
use super::shape::OccupancyMask;
use super::state::Field;
use crate::assets::SpriteCatalog;
use crate::consts::*;
use crate::error::SpawnError;

const W: f32 = SCREEN_WIDTH;

/// Horizontal layouts for obstacle groups (x of each slot)
pub const OBSTACLE_PATTERNS: [&[f32]; 5] = [
    &[W / 2.0],
    &[W / 4.0, W / 2.0, W * 3.0 / 4.0],
    &[150.0, W - 150.0],
    &[W / 3.0, W * 2.0 / 3.0],
    &[W / 6.0, W / 2.0, W * 5.0 / 6.0],
];

/// Chance that a multi-slot group keeps one slot empty as a safe lane
pub const SAFE_LANE_CHANCE: f64 = 0.7;
/// Nudges tried before a blocked spawn is dropped
pub const PLACEMENT_ATTEMPTS: u32 = 5;
/// Maximum horizontal nudge per attempt (px)
pub const PLACEMENT_JITTER: f32 = 60.0;
/// Nudged entities stay this far from the screen edges (px)
pub const PLACEMENT_MARGIN: f32 = 60.0;
/// Monsters appear within this distance of the player's x (px)
pub const MONSTER_JITTER: f32 = 80.0;

pub const GROUP_OBSTACLE_SIZE: Vec2 = Vec2::new(220.0, 220.0);
pub const SINGLE_OBSTACLE_SIZE: Vec2 = Vec2::new(200.0, 200.0);
pub const COIN_SIZE: Vec2 = Vec2::new(64.0, 64.0);
pub const TREE_SIZE: Vec2 = Vec2::new(200.0, 220.0);
pub const TREASURE_SIZE: Vec2 = Vec2::new(140.0, 140.0);
pub const MONSTER_SIZE: Vec2 = Vec2::new(260.0, 260.0);
pub const PICKUP_SIZE: Vec2 = Vec2::new(80.0, 80.0);
/// Pickup fall speed (px per frame)
pub const PICKUP_SPEED: f32 = 4.0;

/// Bernoulli trial for one time slice
#[inline]
pub fn trial<R: Rng + ?Sized>(rng: &mut R, rate_per_sec: f32, dt_ms: f32) -> bool {
    rng.random::<f32>() < rate_per_sec * dt_ms / 1000.0
}

/// Pick which slots of an `len`-slot pattern receive an obstacle.
///
/// Favors two or three obstacles, and with `SAFE_LANE_CHANCE` keeps at least
/// one slot free. Returned indices are sorted and unique.
pub fn choose_group_slots<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let max = if len > 1 && rng.random_bool(SAFE_LANE_CHANCE) {
        len - 1
    } else {
        len
    };
    let wanted = match rng.random_range(0..10) {
        0..=1 => 1,
        2..=5 => 2,
        _ => 3,
    };
    let count = wanted.min(max).max(1);

    let mut slots: Vec<usize> = (0..len).collect();
    slots.shuffle(rng);
    slots.truncate(count);
    slots.sort_unstable();
    slots
}

/// Running totals, mostly for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnStats {
    pub obstacles: u32,
    pub coins: u32,
    pub trees: u32,
    pub treasures: u32,
    pub monsters: u32,
    pub power_ups: u32,
    pub dropped_unavailable: u32,
    pub dropped_placement: u32,
}

impl SpawnStats {
    fn count(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Obstacle => self.obstacles += 1,
            EntityKind::Coin => self.coins += 1,
            EntityKind::Tree => self.trees += 1,
            EntityKind::Treasure => self.treasures += 1,
            EntityKind::Monster => self.monsters += 1,
            EntityKind::PowerUp => self.power_ups += 1,
            EntityKind::Player => {}
        }
    }
}

/// Spawner for one play session
#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: DifficultyConfig,
    /// Time since session start (ms)
    elapsed_ms: f32,
    grace_ms: f32,
    treasure_timer_ms: f32,
    treasure_interval_ms: f32,
    pub stats: SpawnStats,
}

impl Spawner {
    pub fn new(tuning: DifficultyConfig) -> Self {
        Self {
            tuning,
            elapsed_ms: 0.0,
            grace_ms: SPAWN_GRACE_MS,
            treasure_timer_ms: 0.0,
            treasure_interval_ms: TREASURE_INTERVAL_MS,
            stats: SpawnStats::default(),
        }
    }

    /// Probability spawns are still suppressed
    pub fn in_grace(&self) -> bool {
        self.elapsed_ms < self.grace_ms
    }

    /// Run this frame's spawn trials and timers
    pub fn update<R: Rng>(
        &mut self,
        dt_ms: f32,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) {
        self.elapsed_ms += dt_ms;

        if !self.in_grace() {
            let rates = self.tuning.spawn_rates;
            if trial(rng, rates.obstacle_group, dt_ms) {
                let results = self.spawn_obstacle_group(field, rng, catalog);
                for result in results {
                    self.record(EntityKind::Obstacle, result);
                }
            }
            if trial(rng, rates.single_obstacle, dt_ms) {
                let result = self.spawn_single_obstacle(field, rng, catalog);
                self.record(EntityKind::Obstacle, result);
            }
            if trial(rng, rates.coin, dt_ms) {
                let result = self.spawn_coin(field, rng, catalog);
                self.record(EntityKind::Coin, result);
            }
            if trial(rng, rates.tree, dt_ms) {
                let result = self.spawn_tree(field, rng, catalog);
                self.record(EntityKind::Tree, result);
            }
        }

        // Exactly one chest per elapsed interval, however large dt is
        self.treasure_timer_ms += dt_ms;
        if self.treasure_timer_ms >= self.treasure_interval_ms {
            self.treasure_timer_ms = 0.0;
            let result = self.spawn_treasure(field, rng, catalog);
            self.record(EntityKind::Treasure, result);
        }
    }

    /// Tally a spawn attempt; dropped attempts are logged and forgotten
    pub fn record(&mut self, kind: EntityKind, result: Result<u32, SpawnError>) {
        match result {
            Ok(id) => {
                self.stats.count(kind);
                log::trace!("Spawned {:?} #{}", kind, id);
            }
            Err(err @ SpawnError::ResourceUnavailable(_)) => {
                self.stats.dropped_unavailable += 1;
                log::debug!("Spawn skipped: {}", err);
            }
            Err(err @ SpawnError::PlacementExhausted { .. }) => {
                self.stats.dropped_placement += 1;
                log::debug!("Spawn dropped: {}", err);
            }
        }
    }

    /// A row of obstacles following one of the fixed patterns
    pub fn spawn_obstacle_group<R: Rng>(
        &self,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Vec<Result<u32, SpawnError>> {
        let sprites = catalog.sprites(EntityKind::Obstacle);
        if sprites.is_empty() {
            return vec![Err(SpawnError::ResourceUnavailable(EntityKind::Obstacle))];
        }
        let pattern = OBSTACLE_PATTERNS[rng.random_range(0..OBSTACLE_PATTERNS.len())];
        let slots = choose_group_slots(pattern.len(), rng);

        slots
            .into_iter()
            .map(|slot| {
                let sprite = sprites.choose(rng).ok_or(SpawnError::ResourceUnavailable(
                    EntityKind::Obstacle,
                ))?;
                let y = -rng.random_range(400.0..=700.0);
                let entity = Entity::new(
                    0,
                    Behavior::Obstacle,
                    Vec2::new(pattern[slot], y),
                    GROUP_OBSTACLE_SIZE,
                    self.tuning.obstacle_speed,
                )
                .with_sprite(sprite);
                place(field, entity, rng)
            })
            .collect()
    }

    pub fn spawn_single_obstacle<R: Rng>(
        &self,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let sprite = catalog
            .sprites(EntityKind::Obstacle)
            .choose(rng)
            .ok_or(SpawnError::ResourceUnavailable(EntityKind::Obstacle))?;
        let x = rng.random_range(100.0..=W - 100.0);
        let y = -rng.random_range(300.0..=600.0);
        let entity = Entity::new(
            0,
            Behavior::Obstacle,
            Vec2::new(x, y),
            SINGLE_OBSTACLE_SIZE,
            self.tuning.obstacle_speed,
        )
        .with_sprite(sprite);
        place(field, entity, rng)
    }

    pub fn spawn_coin<R: Rng>(
        &self,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let sprite = catalog
            .sprites(EntityKind::Coin)
            .choose(rng)
            .ok_or(SpawnError::ResourceUnavailable(EntityKind::Coin))?;
        let x = rng.random_range(80.0..=W - 80.0);
        let y = -rng.random_range(220.0..=450.0);
        let entity = Entity::new(
            0,
            Behavior::Coin,
            Vec2::new(x, y),
            COIN_SIZE,
            self.tuning.coin_speed,
        )
        .with_sprite(sprite);
        place(field, entity, rng)
    }

    pub fn spawn_tree<R: Rng>(
        &self,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let sprite = catalog
            .sprites(EntityKind::Tree)
            .choose(rng)
            .ok_or(SpawnError::ResourceUnavailable(EntityKind::Tree))?;
        let x = rng.random_range(100.0..=W - 100.0);
        let y = -rng.random_range(350.0..=600.0);
        let entity = Entity::new(
            0,
            Behavior::Tree {
                called_monster: false,
            },
            Vec2::new(x, y),
            TREE_SIZE,
            self.tuning.tree_speed,
        )
        .with_sprite(sprite);
        place(field, entity, rng)
    }

    pub fn spawn_treasure<R: Rng>(
        &self,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let sprite = catalog
            .sprites(EntityKind::Treasure)
            .choose(rng)
            .ok_or(SpawnError::ResourceUnavailable(EntityKind::Treasure))?;
        let x = rng.random_range(120.0..=W - 120.0);
        let entity = Entity::new(
            0,
            Behavior::Treasure,
            Vec2::new(x, -400.0),
            TREASURE_SIZE,
            self.tuning.treasure_speed,
        )
        .with_sprite(sprite);
        log::info!("Treasure chest spawned at x={:.0}", x);
        Ok(field.insert(entity))
    }

    /// Monster summoned by a tree, dropped in just above the screen near the
    /// player so it can give chase
    pub fn spawn_monster<R: Rng>(
        &self,
        player_x: f32,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let sprite = catalog
            .sprites(EntityKind::Monster)
            .choose(rng)
            .ok_or(SpawnError::ResourceUnavailable(EntityKind::Monster))?;
        let x = player_x + rng.random_range(-MONSTER_JITTER..=MONSTER_JITTER);
        // Bottom edge sits 220 px above the screen
        let y = -220.0 - MONSTER_SIZE.y / 2.0;
        let entity = Entity::new(
            0,
            Behavior::Monster { age_ms: 0.0 },
            Vec2::new(x, y),
            MONSTER_SIZE,
            self.tuning.monster_speed,
        )
        .with_sprite(sprite);
        log::info!("Monster summoned at x={:.0}", x);
        Ok(field.insert(entity))
    }

    /// Power-up pickup. Pickups are drawn procedurally when no sprite is
    /// registered, so a missing sprite only omits the image.
    pub fn spawn_power_up<R: Rng>(
        &self,
        kind: PowerUpKind,
        field: &mut Field,
        rng: &mut R,
        catalog: &dyn SpriteCatalog,
    ) -> Result<u32, SpawnError> {
        let x = rng.random_range(100.0..=W - 100.0);
        let entity = Entity::new(
            0,
            Behavior::PowerUp {
                kind,
                spin: 0.0,
                pulse: 0.0,
            },
            Vec2::new(x, -100.0),
            PICKUP_SIZE,
            PICKUP_SPEED,
        );
        let entity = match catalog.sprites(EntityKind::PowerUp).choose(rng) {
            Some(sprite) => entity.with_sprite(sprite),
            None => entity.with_mask(OccupancyMask::ellipse(
                PICKUP_SIZE.x as u32,
                PICKUP_SIZE.y as u32,
            )),
        };
        log::info!("Power-up {} spawned at x={:.0}", kind.as_str(), x);
        Ok(field.insert(entity))
    }
}

/// Insert `entity` unless it overlaps an obstacle or tree, nudging it
/// sideways between attempts.
pub fn place<R: Rng + ?Sized>(
    field: &mut Field,
    mut entity: Entity,
    rng: &mut R,
) -> Result<u32, SpawnError> {
    for _ in 0..PLACEMENT_ATTEMPTS {
        if !field.blocks(&entity.rect()) {
            return Ok(field.insert(entity));
        }
        let nudge = rng.random_range(-PLACEMENT_JITTER..=PLACEMENT_JITTER);
        entity.pos.x =
            (entity.pos.x + nudge).clamp(PLACEMENT_MARGIN, SCREEN_WIDTH - PLACEMENT_MARGIN);
    }
    Err(SpawnError::PlacementExhausted {
        kind: entity.kind(),
        attempts: PLACEMENT_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use crate::settings::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawner() -> Spawner {
        Spawner::new(DifficultyConfig::for_tier(Difficulty::Medium))
    }

    #[test]
    fn test_trial_rate_converges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let rate = 4.0;
        let dt_ms = 1000.0 / 60.0;
        let frames = 60_000;
        let hits = (0..frames).filter(|_| trial(&mut rng, rate, dt_ms)).count() as f32;
        let expected = rate * frames as f32 * dt_ms / 1000.0;
        assert!(
            (hits - expected).abs() < expected * 0.05,
            "hits {hits} vs expected {expected}"
        );
    }

    #[test]
    fn test_trial_independent_of_frame_rate() {
        let mut rng = Pcg32::seed_from_u64(7);
        let rate = 1.2;
        // Same 1000 s of simulated time at 30 and 120 fps
        let slow = (0..30_000).filter(|_| trial(&mut rng, rate, 1000.0 / 30.0)).count() as f32;
        let fast = (0..120_000).filter(|_| trial(&mut rng, rate, 1000.0 / 120.0)).count() as f32;
        assert!((slow - 1200.0).abs() < 120.0, "30 fps: {slow}");
        assert!((fast - 1200.0).abs() < 120.0, "120 fps: {fast}");
    }

    #[test]
    fn test_grace_window_blocks_probability_spawns() {
        let mut rng = Pcg32::seed_from_u64(1);
        let sheet = SpriteSheet::placeholder();
        let mut field = Field::default();
        let mut spawner = spawner();

        // coin rate * dt is above 1 here, so only the grace window stops it
        spawner.update(1_999.0, &mut field, &mut rng, &sheet);
        assert!(spawner.in_grace());
        assert!(field.is_empty());

        spawner.update(1_000.0, &mut field, &mut rng, &sheet);
        assert!(!spawner.in_grace());
        assert!(!field.is_empty());
    }

    #[test]
    fn test_treasure_timer_fires_once_per_interval() {
        let mut rng = Pcg32::seed_from_u64(5);
        let sheet = SpriteSheet::placeholder();
        let mut field = Field::default();
        let mut spawner = spawner();

        spawner.update(TREASURE_INTERVAL_MS - 1.0, &mut field, &mut rng, &sheet);
        assert_eq!(spawner.stats.treasures, 0);

        spawner.update(1.0, &mut field, &mut rng, &sheet);
        assert_eq!(spawner.stats.treasures, 1);

        // A huge step still yields a single chest
        spawner.update(TREASURE_INTERVAL_MS * 3.0, &mut field, &mut rng, &sheet);
        assert_eq!(spawner.stats.treasures, 2);
        assert_eq!(field.count(EntityKind::Treasure), 2);
    }

    #[test]
    fn test_treasure_timer_runs_during_grace() {
        let mut rng = Pcg32::seed_from_u64(5);
        let sheet = SpriteSheet::placeholder();
        let mut field = Field::default();
        let mut spawner = spawner();
        spawner.grace_ms = f32::MAX;
        spawner.update(TREASURE_INTERVAL_MS, &mut field, &mut rng, &sheet);
        assert_eq!(field.len(), 1);
        assert_eq!(field.count(EntityKind::Treasure), 1);
    }

    #[test]
    fn test_group_slots_keep_safe_lane() {
        let mut rng = Pcg32::seed_from_u64(99);
        let runs = 5_000;
        let mut with_gap = 0;
        for _ in 0..runs {
            let slots = choose_group_slots(3, &mut rng);
            assert!(!slots.is_empty() && slots.len() <= 3);
            assert!(slots.windows(2).all(|w| w[0] < w[1]));
            if slots.len() < 3 {
                with_gap += 1;
            }
        }
        assert!(with_gap as f32 / runs as f32 >= 0.7);

        // Single-slot patterns always fill their slot
        assert_eq!(choose_group_slots(1, &mut rng), vec![0]);
    }

    #[test]
    fn test_group_uses_pattern_columns() {
        let mut rng = Pcg32::seed_from_u64(12);
        let sheet = SpriteSheet::placeholder();
        let mut field = Field::default();
        let results = spawner().spawn_obstacle_group(&mut field, &mut rng, &sheet);
        assert!(!results.is_empty());
        let columns: Vec<f32> = OBSTACLE_PATTERNS.iter().flat_map(|p| p.iter().copied()).collect();
        for entity in field.iter() {
            assert_eq!(entity.kind(), EntityKind::Obstacle);
            assert!(entity.pos.y <= -400.0 && entity.pos.y >= -700.0);
            // Unblocked on an empty field, so no nudging happened
            assert!(columns.contains(&entity.pos.x));
        }
    }

    #[test]
    fn test_missing_sprite_is_noop() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut sheet = SpriteSheet::placeholder();
        sheet.remove(EntityKind::Coin);
        sheet.remove(EntityKind::Obstacle);
        let mut field = Field::default();
        let mut spawner = spawner();

        assert_eq!(
            spawner.spawn_coin(&mut field, &mut rng, &sheet),
            Err(SpawnError::ResourceUnavailable(EntityKind::Coin))
        );
        let group = spawner.spawn_obstacle_group(&mut field, &mut rng, &sheet);
        assert!(group.iter().all(|r| r.is_err()));
        assert!(field.is_empty());

        // The per-frame path keeps running and only spawns what it can
        spawner.update(3_000.0, &mut field, &mut rng, &sheet);
        assert_eq!(field.count(EntityKind::Coin), 0);
        assert_eq!(field.count(EntityKind::Obstacle), 0);
        assert!(spawner.stats.dropped_unavailable > 0);
    }

    #[test]
    fn test_blocked_spawn_is_dropped() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut field = Field::default();
        // Wall of obstacles across the whole spawn band
        for i in 0..8 {
            field.insert(Entity::new(
                0,
                Behavior::Obstacle,
                Vec2::new(i as f32 * 200.0, -450.0),
                Vec2::new(220.0, 1_000.0),
                0.0,
            ));
        }
        let before = field.len();
        let coin = Entity::new(0, Behavior::Coin, Vec2::new(640.0, -300.0), COIN_SIZE, 6.0);
        assert_eq!(
            place(&mut field, coin, &mut rng),
            Err(SpawnError::PlacementExhausted {
                kind: EntityKind::Coin,
                attempts: PLACEMENT_ATTEMPTS
            })
        );
        assert_eq!(field.len(), before);
    }

    #[test]
    fn test_monster_spawns_near_player_above_screen() {
        let mut rng = Pcg32::seed_from_u64(4);
        let sheet = SpriteSheet::placeholder();
        let mut field = Field::default();
        let spawner = spawner();
        for _ in 0..50 {
            spawner
                .spawn_monster(500.0, &mut field, &mut rng, &sheet)
                .unwrap();
        }
        for monster in field.iter() {
            assert!((monster.pos.x - 500.0).abs() <= MONSTER_JITTER);
            assert!(monster.rect().bottom() <= 0.0);
        }
    }

    #[test]
    fn test_pickup_without_sprite_still_spawns() {
        let mut rng = Pcg32::seed_from_u64(4);
        let sheet = SpriteSheet::new();
        let mut field = Field::default();
        let id = spawner()
            .spawn_power_up(PowerUpKind::Shield, &mut field, &mut rng, &sheet)
            .unwrap();
        let pickup = field.get(id).unwrap();
        assert!(pickup.sprite.is_none());
        assert!(pickup.mask.is_some());
    }

    proptest! {
        #[test]
        fn prop_placement_never_overlaps(
            seed in any::<u64>(),
            existing in proptest::collection::vec((60.0f32..1220.0, -900.0f32..-100.0, any::<bool>()), 0..12),
            x in 100.0f32..1180.0,
            y in -600.0f32..-300.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut field = Field::default();
            for (ex, ey, is_tree) in existing {
                let behavior = if is_tree {
                    Behavior::Tree { called_monster: false }
                } else {
                    Behavior::Obstacle
                };
                field.insert(Entity::new(0, behavior, Vec2::new(ex, ey), TREE_SIZE, 0.0));
            }
            let before = field.len();
            let candidate = Entity::new(0, Behavior::Obstacle, Vec2::new(x, y), SINGLE_OBSTACLE_SIZE, 0.0);
            match place(&mut field, candidate, &mut rng) {
                Ok(id) => {
                    prop_assert_eq!(field.len(), before + 1);
                    let placed = field.get(id).unwrap().rect();
                    for other in field.iter().filter(|e| e.id != id) {
                        prop_assert!(!placed.overlaps(&other.rect()));
                    }
                }
                Err(_) => prop_assert_eq!(field.len(), before),
            }
        }
    }
}
