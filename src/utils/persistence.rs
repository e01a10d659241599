//! JSON persistence helpers for files under ~/.onebutton/.
//!
//! Every loader falls back to `T::default()` on a missing or unreadable
//! file; saving reports I/O errors to the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SAVE_DIR_NAME: &str = ".onebutton";

/// Get the ~/.onebutton/ directory path, creating it if needed.
pub fn save_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Full path for a file in ~/.onebutton/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(save_dir()?.join(filename))
}

/// Load a JSON file from ~/.onebutton/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    match save_path(filename) {
        Ok(path) => load_json_from(&path),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON to ~/.onebutton/.
pub fn save_json<T: serde::Serialize>(filename: &str, data: &T) -> io::Result<()> {
    save_json_to(&save_path(filename)?, data)
}

/// Load JSON from an explicit path, with the same fallback as [`load_json_or_default`].
pub fn load_json_from<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

/// Save pretty-printed JSON to an explicit path.
pub fn save_json_to<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
