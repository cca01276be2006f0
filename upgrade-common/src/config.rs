//! Assistant Configuration
//!
//! Parses the optional `config.toml` that overrides system directories,
//! the upgrade daemon's D-Bus address and the UI locale. Every field has
//! a default, so a missing file behaves like an empty one.

use crate::error::ConfigError;
use crate::paths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Well-known name of the upgrade daemon
pub const DEFAULT_SERVICE: &str = "org.deepin.SystemUpgrade1";

/// Object path exporting the upgrade daemon's signals
pub const DEFAULT_OBJECT_PATH: &str = "/org/deepin/SystemUpgrade1";

/// Interface carrying the evaluation signals
pub const DEFAULT_INTERFACE: &str = "org.deepin.SystemUpgrade1";

/// The main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub dbus: DbusConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Directories read during evaluation
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Directory desktop entry filenames are resolved against
    #[serde(default = "default_applications_dir")]
    pub applications_dir: PathBuf,

    /// Icon theme search path
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            applications_dir: default_applications_dir(),
            icons_dir: default_icons_dir(),
        }
    }
}

/// Which message bus the daemon lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum BusKind {
    #[default]
    System,
    Session,
}

impl FromStr for BusKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(BusKind::System),
            "session" => Ok(BusKind::Session),
            other => Err(ConfigError::UnknownBus(other.to_string())),
        }
    }
}

impl TryFrom<String> for BusKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Address of the upgrade daemon
#[derive(Debug, Clone, Deserialize)]
pub struct DbusConfig {
    #[serde(default)]
    pub bus: BusKind,

    #[serde(default = "default_service")]
    pub service: String,

    #[serde(default = "default_object_path")]
    pub path: String,

    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for DbusConfig {
    fn default() -> Self {
        Self {
            bus: BusKind::default(),
            service: default_service(),
            path: default_object_path(),
            interface: default_interface(),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    /// Locale used for `Name[locale]=` lookups (default: from environment)
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_applications_dir() -> PathBuf {
    paths::system::applications_dir()
}

fn default_icons_dir() -> PathBuf {
    paths::system::icons_dir()
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

fn default_object_path() -> String {
    DEFAULT_OBJECT_PATH.to_string()
}

fn default_interface() -> String {
    DEFAULT_INTERFACE.to_string()
}

impl AssistantConfig {
    /// Load from the user's config directory, or defaults if there is none
    pub fn load() -> Result<Self, ConfigError> {
        match paths::user::config_file() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a file path
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Locale for desktop entry names: the configured one, else the environment's
    pub fn locale(&self) -> String {
        self.ui
            .locale
            .clone()
            .unwrap_or_else(crate::locale::current_locale)
    }
}
