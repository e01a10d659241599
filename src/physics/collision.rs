//! World scroll and the per-frame collision passes.
//!
//! The world moves left under a pinned player. Each frame the caller runs,
//! in order: [`scroll_world`], [`update_moving_platforms`], [`resolve_landing`],
//! [`collect_shards`], [`hits_hazard`].

use super::player::Player;
use crate::core::constants::CULL_X;
use crate::world::types::{Hazard, Platform, Shard, World};

/// Shift every entity left by `dx` and drop those fully past the cull line.
pub fn scroll_world(world: &mut World, dx: f64) {
    for p in &mut world.platforms {
        p.x -= dx;
    }
    for h in &mut world.hazards {
        h.x -= dx;
    }
    for s in &mut world.shards {
        s.x -= dx;
    }

    world.platforms.retain(|p| p.right() >= CULL_X);
    world.hazards.retain(|h| h.x + h.size >= CULL_X);
    world.shards.retain(|s| s.x + s.size >= CULL_X);
}

/// Move oscillating platforms to their position at `elapsed`.
pub fn update_moving_platforms(platforms: &mut [Platform], elapsed: f64) {
    for p in platforms.iter_mut().filter(|p| p.is_moving()) {
        p.y = p.oscillated_y(elapsed);
    }
}

/// Snap the player onto the first platform whose surface strip it lands on.
///
/// Clears `on_ground` first, so a player who walked off an edge starts
/// falling. Only downward or resting motion can land. Returns the index of
/// the platform landed on.
pub fn resolve_landing(player: &mut Player, platforms: &[Platform]) -> Option<usize> {
    player.on_ground = false;
    if player.vy < 0.0 {
        return None;
    }

    let body = player.bounds();
    let feet_x = player.feet_x();
    for (index, platform) in platforms.iter().enumerate() {
        let surface = platform.surface();
        if body.intersects(&surface) && surface.spans_x(feet_x) {
            player.land_on(surface.y);
            return Some(index);
        }
    }
    None
}

/// Remove every shard overlapping the player. Returns how many were taken.
pub fn collect_shards(player: &Player, shards: &mut Vec<Shard>) -> u32 {
    let body = player.bounds();
    let before = shards.len();
    shards.retain(|s| !body.intersects(&s.bounds()));
    (before - shards.len()) as u32
}

/// True if the player overlaps any hazard.
pub fn hits_hazard(player: &Player, hazards: &[Hazard]) -> bool {
    let body = player.bounds();
    hazards.iter().any(|h| body.intersects(&h.bounds()))
}
