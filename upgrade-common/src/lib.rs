//! Upgrade Assistant Common Library
//!
//! Shared modules for the software evaluation phase of the upgrade tool.
//! This crate has NO GTK4 or async dependencies.

pub mod config;
pub mod desktop_entry;
pub mod error;
pub mod evaluation;
pub mod icon;
pub mod locale;
pub mod paths;
pub mod progress;
pub mod session;
pub mod worker;
