//! Scrolling world: entity types and procedural generation.

pub mod generation;
pub mod types;

pub use generation::{ensure_content, generate_chunk, start_platform, GenContext};
pub use types::*;
