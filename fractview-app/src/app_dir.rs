//! Locations next to the executable, so a standalone binary keeps its
//! preferences and output together.

use std::path::PathBuf;

/// Directory containing the running executable, falling back to the
/// current directory.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default destination for rendered frames.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}

pub fn preferences_path() -> PathBuf {
    exe_directory().join("preferences.json")
}
