//! Sprite catalog seam
//!
//! Image loading and path resolution belong to the host. The simulation only
//! needs to know which sprites exist for each entity kind (so it can pick a
//! variant or skip a spawn) and, optionally, each sprite's occupancy mask.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::sim::EntityKind;
use crate::sim::shape::OccupancyMask;

/// Opaque handle the renderer uses to find the loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SpriteId(pub u32);

/// A loaded sprite as seen by the simulation
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    /// Occupancy mask for fine collisions (None = solid rectangle)
    pub mask: Option<Arc<OccupancyMask>>,
}

impl Sprite {
    pub fn new(id: SpriteId) -> Self {
        Self { id, mask: None }
    }

    pub fn with_mask(mut self, mask: OccupancyMask) -> Self {
        self.mask = Some(Arc::new(mask));
        self
    }
}

/// Source of sprites for each entity kind.
///
/// An empty slice means the resource is unavailable; spawns of that kind
/// become no-ops.
pub trait SpriteCatalog: fmt::Debug {
    fn sprites(&self, kind: EntityKind) -> &[Sprite];
}

/// Simple in-memory catalog filled by the host after loading images
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet {
    sprites: HashMap<EntityKind, Vec<Sprite>>,
    next_id: u32,
}

impl SpriteSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite for a kind, returning its handle
    pub fn insert(&mut self, kind: EntityKind, mask: Option<OccupancyMask>) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        let mut sprite = Sprite::new(id);
        if let Some(mask) = mask {
            sprite = sprite.with_mask(mask);
        }
        self.sprites.entry(kind).or_default().push(sprite);
        id
    }

    /// Drop every sprite registered for a kind
    pub fn remove(&mut self, kind: EntityKind) {
        self.sprites.remove(&kind);
    }

    /// One sprite per kind with shape-appropriate masks.
    ///
    /// Used by the headless driver and tests where no real images exist:
    /// coins, pickups and monsters are round, trees and the surfer are
    /// elliptical, rocks are solid boxes.
    pub fn placeholder() -> Self {
        let mut sheet = Self::new();
        sheet.insert(EntityKind::Player, Some(OccupancyMask::ellipse(70, 70)));
        // Two rock variants
        sheet.insert(EntityKind::Obstacle, None);
        sheet.insert(EntityKind::Obstacle, Some(OccupancyMask::ellipse(55, 55)));
        sheet.insert(EntityKind::Coin, Some(OccupancyMask::ellipse(32, 32)));
        sheet.insert(EntityKind::Treasure, None);
        sheet.insert(EntityKind::Tree, Some(OccupancyMask::ellipse(50, 55)));
        sheet.insert(EntityKind::Monster, Some(OccupancyMask::ellipse(65, 65)));
        sheet.insert(EntityKind::PowerUp, Some(OccupancyMask::ellipse(40, 40)));
        sheet
    }
}

impl SpriteCatalog for SpriteSheet {
    fn sprites(&self, kind: EntityKind) -> &[Sprite] {
        self.sprites.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
