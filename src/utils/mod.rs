//! Utility modules: build info, logging, persistence.

pub mod build_info;
pub mod logging;
pub mod persistence;

pub use build_info::version_line;
