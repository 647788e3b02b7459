use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};

use super::backend::ClipboardBackend;

/// Wayland clipboard backend using wl-clipboard tools
/// Requires wl-copy to be installed
pub struct WaylandBackend;

impl WaylandBackend {
    pub fn new() -> Result<Self> {
        Command::new("wl-copy")
            .arg("--version")
            .output()
            .context("wl-copy not found. Install wl-clipboard package")?;

        log::debug!("WaylandBackend initialized successfully");
        Ok(WaylandBackend)
    }

    /// Pipe bytes into `wl-copy --type <mime>`
    fn copy(&self, data: &[u8], mime_type: &str) -> Result<()> {
        let mut child = Command::new("wl-copy")
            .arg("--type")
            .arg(mime_type)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn wl-copy")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(data)
                .context("Failed to write to wl-copy stdin")?;
        }

        let status = child.wait().context("Failed to wait for wl-copy")?;
        if !status.success() {
            return Err(anyhow!("wl-copy failed with status: {}", status));
        }

        log::debug!("Wrote {} bytes of {} to clipboard", data.len(), mime_type);
        Ok(())
    }
}

impl ClipboardBackend for WaylandBackend {
    fn write_text(&self, text: &str) -> Result<()> {
        self.copy(text.as_bytes(), "text/plain;charset=utf-8")
    }

    fn write_image(&self, data: &[u8], mime_type: &str) -> Result<()> {
        self.copy(data, mime_type)
    }

    fn write_files(&self, uri_list: &str) -> Result<()> {
        self.copy(uri_list.as_bytes(), "text/uri-list")
    }

    fn name(&self) -> &'static str {
        "Wayland"
    }
}
