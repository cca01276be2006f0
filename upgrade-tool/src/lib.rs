//! Upgrade Tool Library
//!
//! This library provides the software evaluation phase of the upgrade tool:
//! - D-Bus worker listening to the upgrade daemon
//! - Demo worker for running without the daemon
//! - Headless report mode
//! - GUI pages and wizard

// Re-export from upgrade-common for convenience
pub use upgrade_common::{
    config, desktop_entry, error, evaluation, icon, locale, paths, progress, session, worker,
};

pub mod dbus;
pub mod demo;
pub mod report;
pub mod settings;
pub mod ui;
