//! One Button Hero - single-input endless runner with a global Top 10.
//!
//! This library holds the game core (generation, physics, scoring, run state),
//! the leaderboard client and the session glue. The terminal frontend lives in
//! the binary.

pub mod core;
pub mod leaderboard;
pub mod physics;
pub mod profile;
pub mod run;
pub mod scoring;
pub mod session;
pub mod utils;
pub mod world;
