//! World entity types: platforms, hazards and shard pickups.

use crate::core::constants::{
    LEDGE_FIT_HEIGHT, SURFACE_COLLISION_HEIGHT, TALL_LEDGE_FIT_MULTIPLIER,
};
use crate::core::geometry::Rect;
use rand::Rng;

/// Ledge sprite used to draw a platform. Also decides the platform's
/// collision span, since landing is only allowed on the drawn ledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgeStyle {
    /// Tall rocky ledge, drawn at three times the normal fit height.
    Ledge1,
    /// Short slab, always tiled twice.
    Ledge2,
    /// Long thin girder.
    Ledge3,
    /// Plank, optionally tiled twice.
    Ledge4,
}

impl LedgeStyle {
    pub const ALL: [LedgeStyle; 4] = [
        LedgeStyle::Ledge1,
        LedgeStyle::Ledge2,
        LedgeStyle::Ledge3,
        LedgeStyle::Ledge4,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_index(rng.gen_range(0..Self::ALL.len()))
    }

    /// Natural sprite size in pixels (width, height).
    pub fn natural_size(&self) -> (f64, f64) {
        match self {
            Self::Ledge1 => (600.0, 200.0),
            Self::Ledge2 => (320.0, 40.0),
            Self::Ledge3 => (640.0, 48.0),
            Self::Ledge4 => (480.0, 44.0),
        }
    }

    /// Height the sprite is scaled to fit.
    pub fn fit_height(&self) -> f64 {
        match self {
            Self::Ledge1 => LEDGE_FIT_HEIGHT * TALL_LEDGE_FIT_MULTIPLIER,
            _ => LEDGE_FIT_HEIGHT,
        }
    }

    /// Number of side-by-side tiles drawn for a platform with this style.
    pub fn tiles(&self, double: bool) -> u32 {
        match self {
            Self::Ledge2 => 2,
            Self::Ledge4 if double => 2,
            _ => 1,
        }
    }
}

/// Cosmetic look of a shard pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoltStyle {
    Bolt1,
    Bolt2,
    Bolt3,
    Bolt4,
    Bolt5,
    Bolt6,
}

impl BoltStyle {
    pub const ALL: [BoltStyle; 6] = [
        BoltStyle::Bolt1,
        BoltStyle::Bolt2,
        BoltStyle::Bolt3,
        BoltStyle::Bolt4,
        BoltStyle::Bolt5,
        BoltStyle::Bolt6,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Where and how large the ledge sprite is drawn for a platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgeGeometry {
    pub draw_x: f64,
    pub total_width: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub tiles: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub x: f64,
    /// Current top surface, updated each frame for oscillating platforms.
    pub y: f64,
    /// Anchor for oscillation.
    pub base_y: f64,
    pub width: f64,
    pub amplitude: f64,
    pub speed: f64,
    pub phase: f64,
    pub ledge: LedgeStyle,
    pub double: bool,
}

impl Platform {
    /// A platform that does not move vertically.
    pub fn fixed(x: f64, y: f64, width: f64, ledge: LedgeStyle, double: bool) -> Self {
        Self {
            x,
            y,
            base_y: y,
            width,
            amplitude: 0.0,
            speed: 0.0,
            phase: 0.0,
            ledge,
            double,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn is_moving(&self) -> bool {
        self.amplitude > 0.0
    }

    /// Vertical position at `elapsed` seconds into the run.
    pub fn oscillated_y(&self, elapsed: f64) -> f64 {
        self.base_y + self.amplitude * (self.phase + self.speed * elapsed).sin()
    }

    /// Fit the ledge sprite inside the platform box, centred horizontally.
    pub fn ledge_geometry(&self) -> LedgeGeometry {
        let (natural_w, natural_h) = self.ledge.natural_size();
        let tiles = self.ledge.tiles(self.double);
        let scale =
            (self.width / (tiles as f64 * natural_w)).min(self.ledge.fit_height() / natural_h);
        let tile_width = natural_w * scale;
        let total_width = tile_width * tiles as f64;
        LedgeGeometry {
            draw_x: self.x + (self.width - total_width) / 2.0,
            total_width,
            tile_width,
            tile_height: natural_h * scale,
            tiles,
        }
    }

    /// Thin landing strip along the visible top edge of the ledge.
    pub fn surface(&self) -> Rect {
        let geo = self.ledge_geometry();
        Rect::new(geo.draw_x, self.y, geo.total_width, SURFACE_COLLISION_HEIGHT)
    }
}

/// A square obstacle. Ground and ceiling hazards differ only in placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Hazard {
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }
}

/// A collectible shard.
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub bolt: BoltStyle,
}

impl Shard {
    pub fn bounds(&self) -> Rect {
        Rect::square(self.x, self.y, self.size)
    }
}

/// All live world entities, in generation order.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub shards: Vec<Shard>,
}

impl World {
    pub fn clear(&mut self) {
        self.platforms.clear();
        self.hazards.clear();
        self.shards.clear();
    }

    /// Rightmost generated edge, or 0 when no platform exists.
    pub fn right_edge(&self) -> f64 {
        self.platforms
            .iter()
            .map(Platform::right)
            .fold(0.0, f64::max)
    }

    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.platforms.push(chunk.platform);
        self.hazards.extend(chunk.hazards);
        self.shards.extend(chunk.shards);
    }
}

/// One generation step's output.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub platform: Platform,
    pub hazards: Vec<Hazard>,
    pub shards: Vec<Shard>,
    /// Where the next chunk starts (the platform's right edge).
    pub next_x: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledge_tiles() {
        assert_eq!(LedgeStyle::Ledge1.tiles(true), 1);
        assert_eq!(LedgeStyle::Ledge2.tiles(false), 2);
        assert_eq!(LedgeStyle::Ledge3.tiles(true), 1);
        assert_eq!(LedgeStyle::Ledge4.tiles(false), 1);
        assert_eq!(LedgeStyle::Ledge4.tiles(true), 2);
    }

    #[test]
    fn test_tall_ledge_fit_height() {
        assert!((LedgeStyle::Ledge1.fit_height() - 66.0).abs() < 1e-9);
        assert!((LedgeStyle::Ledge3.fit_height() - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_is_centred_and_within_platform() {
        for ledge in LedgeStyle::ALL {
            for double in [false, true] {
                let p = Platform::fixed(100.0, 400.0, 260.0, ledge, double);
                let geo = p.ledge_geometry();
                assert!(geo.total_width <= p.width + 1e-9);
                assert!(geo.draw_x >= p.x - 1e-9);
                let left_gap = geo.draw_x - p.x;
                let right_gap = p.right() - (geo.draw_x + geo.total_width);
                assert!((left_gap - right_gap).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_double_ledge4_is_wider() {
        let single = Platform::fixed(0.0, 0.0, 300.0, LedgeStyle::Ledge4, false);
        let double = Platform::fixed(0.0, 0.0, 300.0, LedgeStyle::Ledge4, true);
        assert!(double.ledge_geometry().total_width > single.ledge_geometry().total_width);
        assert_eq!(double.ledge_geometry().tiles, 2);
    }

    #[test]
    fn test_surface_is_thin_strip_at_top() {
        let p = Platform::fixed(0.0, 500.0, 300.0, LedgeStyle::Ledge3, false);
        let s = p.surface();
        assert!((s.y - 500.0).abs() < f64::EPSILON);
        assert!((s.h - SURFACE_COLLISION_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_oscillation() {
        let mut p = Platform::fixed(0.0, 300.0, 200.0, LedgeStyle::Ledge3, false);
        assert!(!p.is_moving());
        p.amplitude = 20.0;
        p.speed = 2.0;
        p.phase = std::f64::consts::FRAC_PI_2;
        assert!(p.is_moving());
        assert!((p.oscillated_y(0.0) - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_edge_of_empty_world_is_zero() {
        let world = World::default();
        assert_eq!(world.right_edge(), 0.0);
    }
}
