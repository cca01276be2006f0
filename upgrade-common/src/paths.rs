//! Centralized Path Definitions
//!
//! System directories read during software evaluation, plus the user
//! configuration location. Centralizing these prevents hardcoded strings
//! scattered across the codebase.

/// System-wide data paths
pub mod system {
    use std::path::PathBuf;

    /// System-wide share directory
    pub const SHARE_DIR: &str = "/usr/share";

    /// System-wide applications directory (for .desktop files)
    pub const APPLICATIONS_DIR: &str = "/usr/share/applications";

    /// System-wide icon themes directory
    pub const ICONS_DIR: &str = "/usr/share/icons";

    /// Get the applications directory as PathBuf
    pub fn applications_dir() -> PathBuf {
        PathBuf::from(APPLICATIONS_DIR)
    }

    /// Get the icons directory as PathBuf
    pub fn icons_dir() -> PathBuf {
        PathBuf::from(ICONS_DIR)
    }
}

/// Per-user paths
pub mod user {
    use std::path::PathBuf;

    /// Directory name used under the XDG config directory
    pub const APP_DIR_NAME: &str = "upgrade-assistant";

    /// Get the config file path (~/.config/upgrade-assistant/config.toml)
    pub fn config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.toml"))
    }
}

/// Desktop entry naming conventions
pub mod desktop {
    use std::path::{Path, PathBuf};

    /// Extension used by desktop entry files
    pub const EXTENSION: &str = "desktop";

    /// Resolve a desktop entry filename against an applications directory.
    ///
    /// Absolute filenames are returned unchanged.
    pub fn resolve(applications_dir: &Path, filename: &str) -> PathBuf {
        applications_dir.join(filename)
    }

    /// Check whether a path looks like a desktop entry file
    pub fn is_desktop_file(path: &Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some(EXTENSION)
    }
}
