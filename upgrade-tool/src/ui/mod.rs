//! UI Module - GTK4 + Libadwaita Interface
//!
//! The software evaluation wizard: a check-progress page followed by the
//! evaluation result page.

pub mod app;
pub mod window;
pub mod wizard;
pub mod pages;
