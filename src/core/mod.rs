//! Shared constants, configuration, geometry and frame timing.

pub mod clock;
pub mod config;
pub mod constants;
pub mod geometry;

pub use clock::{clamp_dt, FrameClock};
pub use config::{EconomyTuning, FirestoreConfig, GameConfig, PhysicsTuning, Tuning, WorldTuning};
pub use geometry::{Rect, Viewport};
