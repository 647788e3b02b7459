pub mod backend;
pub mod watch;
pub mod wayland;
pub mod x11;

use anyhow::{Result, anyhow};
use std::env;
use std::path::{Component, PathBuf};

pub use backend::ClipboardBackend;
pub use wayland::WaylandBackend;
pub use x11::X11Backend;

/// Create a clipboard backend based on the current display server
/// Wayland is preferred when both WAYLAND_DISPLAY and DISPLAY are set
pub fn create_backend() -> Result<Box<dyn ClipboardBackend>> {
    if env::var("WAYLAND_DISPLAY").is_ok() {
        log::info!("Detected Wayland display server");
        return Ok(Box::new(WaylandBackend::new()?));
    }

    if env::var("DISPLAY").is_ok() {
        log::info!("Detected X11 display server");
        return Ok(Box::new(X11Backend::new()?));
    }

    Err(anyhow!(
        "No supported display server detected (WAYLAND_DISPLAY and DISPLAY are unset)"
    ))
}

/// Encode paths as a text/uri-list payload
pub fn to_uri_list(paths: &[PathBuf]) -> String {
    let mut list = String::new();
    for path in paths {
        list.push_str("file://");
        for component in path.components() {
            match component {
                Component::RootDir => {}
                other => {
                    list.push('/');
                    list.push_str(&urlencoding::encode(&other.as_os_str().to_string_lossy()));
                }
            }
        }
        list.push_str("\r\n");
    }
    list
}
