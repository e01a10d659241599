//! Logger setup for the binaries.
//!
//! The terminal UI owns stdout/stderr, so the game logs to a file under
//! ~/.onebutton/. The headless simulator logs to stderr. Both honour `RUST_LOG`.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

pub const LOG_FILE: &str = "onebutton.log";

fn builder(verbose: bool) -> Builder {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::from_env(Env::default().default_filter_or(level.to_string()))
}

/// Log to stderr.
pub fn init_stderr(verbose: bool) {
    // Fails only if a logger is already installed.
    let _ = builder(verbose).try_init();
}

/// Append log lines to `path`.
pub fn init_file(path: &Path, verbose: bool) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut builder = builder(verbose);
    builder.target(Target::Pipe(Box::new(file)));
    let _ = builder.try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_file_creates_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOG_FILE);
        init_file(&path, false).unwrap();
        assert!(path.exists());
        // A second init is harmless.
        init_stderr(true);
    }
}
