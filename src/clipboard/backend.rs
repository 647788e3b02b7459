use anyhow::Result;

use crate::models::ClipContent;

/// Trait for clipboard backend abstraction
/// Supports different clipboard systems (Wayland, X11)
/// Backend is write-only: used to copy selected clips back to the clipboard
/// Clipboard monitoring is handled separately via watcher processes
pub trait ClipboardBackend: Send + Sync {
    /// Write text to clipboard
    fn write_text(&self, text: &str) -> Result<()>;

    /// Write image bytes with the given mime type
    fn write_image(&self, data: &[u8], mime_type: &str) -> Result<()>;

    /// Write a file list as text/uri-list
    fn write_files(&self, uri_list: &str) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Put any stored content back on the clipboard
    fn write_content(&self, content: &ClipContent) -> Result<()> {
        match content {
            ClipContent::Text(text) => self.write_text(text),
            ClipContent::Image { data, mime_type } => self.write_image(data, mime_type),
            ClipContent::Files(paths) => self.write_files(&super::to_uri_list(paths)),
        }
    }
}
