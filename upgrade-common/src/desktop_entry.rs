//! Desktop Entry Parsing
//!
//! Extracts the display name, icon and `NoDisplay` flag of an installed
//! application from its `.desktop` file. Only the `Icon`, `Name`,
//! `Name[locale]` and `NoDisplay` keys are recognized.
//!
//! Parsing never fails: an unreadable file yields an [`AppInfo`] whose
//! name is the file path, so the result table can still show a row.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One application discovered from a desktop entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Display name (localized when available)
    pub name: String,

    /// Absolute icon file path or icon theme name; may be empty
    pub icon_name: String,

    /// True only when the entry says `NoDisplay=true`
    pub no_display: bool,
}

impl AppInfo {
    /// Parse the desktop entry at `path` using `locale` for `Name[locale]=`
    pub fn from_desktop_file(path: &Path, locale: &str) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => Self::from_desktop_str(&String::from_utf8_lossy(&bytes), locale),
            Err(e) => {
                tracing::debug!("Cannot read desktop entry {:?}: {}", path, e);
                Self::unreadable(path)
            }
        }
    }

    /// Parse desktop entry contents
    pub fn from_desktop_str(content: &str, locale: &str) -> Self {
        let localized_key = format!("Name[{}]=", locale);

        let mut icon_name = String::new();
        let mut localized_name = String::new();
        let mut fallback_name = String::new();
        let mut no_display = false;

        for line in content.lines() {
            if let Some(value) = line.strip_prefix("Icon=") {
                icon_name = field(value).to_string();
            } else if let Some(value) = line.strip_prefix(localized_key.as_str()) {
                localized_name = field(value).to_string();
            } else if let Some(value) = line.strip_prefix("Name=") {
                fallback_name = field(value).to_string();
            } else if let Some(value) = line.strip_prefix("NoDisplay=") {
                no_display = field(value) == "true";
            }
        }

        let name = if localized_name.is_empty() {
            fallback_name
        } else {
            localized_name
        };

        Self {
            name,
            icon_name,
            no_display,
        }
    }

    /// Placeholder for a desktop entry that could not be opened
    pub fn unreadable(path: &Path) -> Self {
        Self {
            name: path.display().to_string(),
            icon_name: String::new(),
            no_display: false,
        }
    }

    /// Whether launchers would show this application
    pub fn is_visible(&self) -> bool {
        !self.no_display
    }
}

/// Text up to the next `=`, trimmed
fn field(value: &str) -> &str {
    value.split('=').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_entry(dir: &Path, filename: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(filename);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_name_only() {
        let info = AppInfo::from_desktop_str("[Desktop Entry]\nName=Files\n", "zh_CN");
        assert_eq!(info.name, "Files");
        assert_eq!(info.icon_name, "");
        assert!(info.is_visible());
    }

    #[test]
    fn test_localized_name_wins() {
        let content = "[Desktop Entry]\nName=Files\nName[zh_CN]=文件管理器\nName[de]=Dateien\n";
        let info = AppInfo::from_desktop_str(content, "zh_CN");
        assert_eq!(info.name, "文件管理器");

        let info = AppInfo::from_desktop_str(content, "de");
        assert_eq!(info.name, "Dateien");
    }

    #[test]
    fn test_localized_name_order_does_not_matter() {
        let content = "Name[zh_CN]=终端\nName=Terminal\n";
        let info = AppInfo::from_desktop_str(content, "zh_CN");
        assert_eq!(info.name, "终端");
    }

    #[test]
    fn test_other_locale_falls_back() {
        let content = "Name=Terminal\nName[zh_CN]=终端\n";
        let info = AppInfo::from_desktop_str(content, "fr_FR");
        assert_eq!(info.name, "Terminal");
    }

    #[test]
    fn test_empty_localized_name_falls_back() {
        let content = "Name=Terminal\nName[zh_CN]=   \n";
        let info = AppInfo::from_desktop_str(content, "zh_CN");
        assert_eq!(info.name, "Terminal");
    }

    #[test]
    fn test_locale_prefix_is_exact() {
        // zh must not match Name[zh_CN]
        let content = "Name=Terminal\nName[zh_CN]=终端\n";
        let info = AppInfo::from_desktop_str(content, "zh");
        assert_eq!(info.name, "Terminal");
    }

    #[test]
    fn test_no_display_polarity() {
        let hidden = AppInfo::from_desktop_str("Name=A\nNoDisplay=true\n", "C");
        assert!(hidden.no_display);
        assert!(!hidden.is_visible());

        let shown = AppInfo::from_desktop_str("Name=A\nNoDisplay=false\n", "C");
        assert!(shown.is_visible());

        let odd = AppInfo::from_desktop_str("Name=A\nNoDisplay=True\n", "C");
        assert!(odd.is_visible());

        let absent = AppInfo::from_desktop_str("Name=A\n", "C");
        assert!(absent.is_visible());
    }

    #[test]
    fn test_last_match_wins() {
        let content = "[Desktop Entry]\nName=Browser\nIcon=browser\n\
                       [Desktop Action new-window]\nName=New Window\nIcon=window-new\n";
        let info = AppInfo::from_desktop_str(content, "C");
        assert_eq!(info.name, "New Window");
        assert_eq!(info.icon_name, "window-new");
    }

    #[test]
    fn test_values_are_trimmed() {
        let info = AppInfo::from_desktop_str("Name=  Foo  \r\nIcon= /opt/x/icon.png \n", "C");
        assert_eq!(info.name, "Foo");
        assert_eq!(info.icon_name, "/opt/x/icon.png");
    }

    #[test]
    fn test_values_stop_at_next_equals() {
        let info = AppInfo::from_desktop_str(
            "Name=Foo=Bar\nName[zh_CN]= Ni=Hao \nIcon=/opt/a=b/icon.png\nNoDisplay=true=1\n",
            "zh_CN",
        );
        assert_eq!(info.name, "Ni");
        assert_eq!(info.icon_name, "/opt/a");
        assert!(info.no_display);

        let fallback = AppInfo::from_desktop_str("Name=Foo=Bar\n", "C");
        assert_eq!(fallback.name, "Foo");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let content = "garbage\n=\nName\nIconic=nope\nNameX=nope\n  Name=indented\nName=Real\n";
        let info = AppInfo::from_desktop_str(content, "C");
        assert_eq!(info.name, "Real");
        assert_eq!(info.icon_name, "");
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_entry(dir.path(), "foo.desktop", "Name=Foo App\nIcon=foo-icon\n");

        let info = AppInfo::from_desktop_file(&path, "C");
        assert_eq!(
            info,
            AppInfo {
                name: "Foo App".to_string(),
                icon_name: "foo-icon".to_string(),
                no_display: false,
            }
        );
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.desktop");
        std::fs::write(&path, b"Comment=\xff\xfe\nName=Still Here\n").unwrap();

        let info = AppInfo::from_desktop_file(&path, "C");
        assert_eq!(info.name, "Still Here");
    }

    #[test]
    fn test_unreadable_file_uses_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.desktop");

        let info = AppInfo::from_desktop_file(&path, "C");
        assert_eq!(info.name, path.display().to_string());
        assert_eq!(info.icon_name, "");
        assert!(info.is_visible());
    }
}
