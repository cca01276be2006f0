//! Resolved runtime settings
//!
//! The config file provides defaults; command-line flags override them.

use std::path::PathBuf;
use upgrade_common::config::{AssistantConfig, DbusConfig};

#[derive(Debug, Clone)]
pub struct Settings {
    pub applications_dir: PathBuf,
    pub icons_dir: PathBuf,
    pub locale: String,
    pub dbus: DbusConfig,
}

impl Settings {
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            applications_dir: config.paths.applications_dir.clone(),
            icons_dir: config.paths.icons_dir.clone(),
            locale: config.locale(),
            dbus: config.dbus.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}
