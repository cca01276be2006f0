//! Icon references from desktop entries
//!
//! A desktop entry's `Icon=` value is either an absolute file path or a
//! name to look up in the icon theme. Resolution itself is left to the
//! toolkit; this only decides which kind of lookup a cell should request.

use std::path::PathBuf;

/// Generic icon shown when an application's own icon is unavailable
pub const FALLBACK_ICON: &str = "application-x-executable";

/// Pixel size of icons in the result table
pub const CELL_ICON_SIZE: i32 = 24;

/// How an icon should be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Load the image file at this absolute path
    File(PathBuf),
    /// Look the name up in the icon theme
    Themed(String),
}

impl IconSource {
    /// Classify an `Icon=` value
    pub fn from_icon_name(icon_name: &str) -> Self {
        if icon_name.starts_with('/') {
            IconSource::File(PathBuf::from(icon_name))
        } else if icon_name.is_empty() {
            IconSource::fallback()
        } else {
            IconSource::Themed(icon_name.to_string())
        }
    }

    /// The generic themed icon
    pub fn fallback() -> Self {
        IconSource::Themed(FALLBACK_ICON.to_string())
    }
}
