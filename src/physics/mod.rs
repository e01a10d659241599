//! Player motion and collision against the scrolling world.

pub mod collision;
pub mod player;

pub use collision::{
    collect_shards, hits_hazard, resolve_landing, scroll_world, update_moving_platforms,
};
pub use player::Player;
