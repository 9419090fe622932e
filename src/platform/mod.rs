// LuxeMarks platform paths
// Linux:   $XDG_CONFIG_HOME/luxemarks, $XDG_DATA_HOME/luxemarks
// macOS:   ~/Library/Application Support/LuxeMarks
// Windows: %APPDATA%/LuxeMarks

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "LUXEMARKS_DATA_DIR";

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the platform-specific configuration directory.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("luxemarks"),
            Err(_) => home_dir().join(".config").join("luxemarks"),
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("LuxeMarks")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("LuxeMarks")
    }
}

/// Returns the platform-specific data directory.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("luxemarks"),
            Err(_) => home_dir().join(".local").join("share").join("luxemarks"),
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}

/// Picks the data directory: `LUXEMARKS_DATA_DIR`, then the configured
/// override, then the platform default.
pub fn resolve_data_dir(configured: Option<&str>) -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match configured {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => get_data_dir(),
    }
}
