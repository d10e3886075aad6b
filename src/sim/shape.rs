//! Collision geometry
//!
//! Every entity has an axis-aligned bounding rectangle. Sprites may also
//! provide an occupancy mask (one bit per source pixel, stretched over the
//! rectangle) for forgiving fine-grained overlap tests. Shapes without a mask
//! are treated as solid rectangles, so the fine test degrades to the coarse
//! one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its center and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Coarse overlap; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let min = Vec2::new(self.left().max(other.left()), self.top().max(other.top()));
        let max = Vec2::new(
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        Some(Rect::new((min + max) / 2.0, max - min))
    }
}

/// Per-pixel occupancy of a sprite image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl OccupancyMask {
    /// Build from an alpha channel (row-major, one byte per pixel).
    ///
    /// Pixels with alpha above `threshold` are occupied. Returns `None` when
    /// the buffer does not match the dimensions.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        if width == 0 || height == 0 || alpha.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > threshold).collect(),
        })
    }

    /// Fully occupied mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            bits: vec![true; (width.max(1) * height.max(1)) as usize],
        }
    }

    /// Ellipse inscribed in the mask bounds (round pickups, coins)
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1), height.max(1));
        let mut bits = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let nx = (x as f32 + 0.5) / w as f32 * 2.0 - 1.0;
                let ny = (y as f32 + 0.5) / h as f32 * 2.0 - 1.0;
                bits.push(nx * nx + ny * ny <= 1.0);
            }
        }
        Self {
            width: w,
            height: h,
            bits,
        }
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    /// Sample at normalized coordinates (0..1 across each axis)
    pub fn sample(&self, u: f32, v: f32) -> bool {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return false;
        }
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.is_set(x, y)
    }

    /// Number of occupied pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

/// Collision shape of an entity at its current position
#[derive(Debug, Clone, Copy)]
pub struct Hitbox<'a> {
    /// Axis-aligned bounds of the shape as placed (rotation included)
    pub rect: Rect,
    pub mask: Option<&'a OccupancyMask>,
    /// Unrotated size the mask is stretched over
    body: Vec2,
    /// Degrees, clockwise about `rect.center`
    rotation: f32,
}

impl<'a> Hitbox<'a> {
    pub fn new(rect: Rect, mask: Option<&'a OccupancyMask>) -> Self {
        Self {
            rect,
            mask,
            body: rect.size,
            rotation: 0.0,
        }
    }

    /// Shape turned about its center; `rect` grows to the rotated bounds
    pub fn rotated(rect: Rect, mask: Option<&'a OccupancyMask>, degrees: f32) -> Self {
        if degrees == 0.0 {
            return Self::new(rect, mask);
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let bounds = Vec2::new(
            rect.size.x * cos + rect.size.y * sin,
            rect.size.x * sin + rect.size.y * cos,
        );
        Self {
            rect: Rect::new(rect.center, bounds),
            mask,
            body: rect.size,
            rotation: degrees,
        }
    }

    #[inline]
    fn is_axis_aligned(&self) -> bool {
        self.rotation == 0.0
    }

    /// Whether the world-space point is occupied by this shape
    pub fn occupies(&self, p: Vec2) -> bool {
        if !self.rect.contains_point(p) {
            return false;
        }
        let mut local = p - self.rect.center;
        if !self.is_axis_aligned() {
            local = Vec2::from_angle(-self.rotation.to_radians()).rotate(local);
        }
        let body = Rect::new(Vec2::ZERO, self.body);
        if !body.contains_point(local) {
            return false;
        }
        match self.mask {
            None => true,
            Some(mask) => {
                let uv = (local - body.min()) / body.size;
                mask.sample(uv.x, uv.y)
            }
        }
    }
}

/// Bounding-rectangle overlap
#[inline]
pub fn coarse_overlap(a: &Hitbox<'_>, b: &Hitbox<'_>) -> bool {
    a.rect.overlaps(&b.rect)
}

/// Occupancy-accurate overlap.
///
/// Samples pixel centers over the intersection of the two rectangles and
/// reports a hit as soon as one pixel is occupied by both shapes.
pub fn fine_overlap(a: &Hitbox<'_>, b: &Hitbox<'_>) -> bool {
    let Some(inter) = a.rect.intersection(&b.rect) else {
        return false;
    };
    let solid = |h: &Hitbox<'_>| h.mask.is_none() && h.is_axis_aligned();
    if solid(a) && solid(b) {
        return true;
    }

    let x0 = inter.left().floor() as i32;
    let x1 = inter.right().ceil() as i32;
    let y0 = inter.top().floor() as i32;
    let y1 = inter.bottom().ceil() as i32;

    for py in y0..y1 {
        for px in x0..x1 {
            let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            if inter.contains_point(p) && a.occupies(p) && b.occupies(p) {
                return true;
            }
        }
    }
    false
}
