//! Draobpilc - clipboard history manager with a searchable terminal UI
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod clipboard;
pub mod desktop;
pub mod logging;
pub mod models;
pub mod signals;
pub mod storage;
pub mod store;
pub mod ui;

/// Directory name under the XDG data and config homes
pub const APP_ID: &str = "draobpilc";
pub const APP_NAME: &str = "Draobpilc";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = "Clipboard history manager";
/// Freedesktop icon used by the desktop launcher
pub const ICON_NAME: &str = "edit-paste";
