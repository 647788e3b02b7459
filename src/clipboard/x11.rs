use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};

use super::backend::ClipboardBackend;

/// X11 clipboard backend using xclip
pub struct X11Backend;

impl X11Backend {
    pub fn new() -> Result<Self> {
        Command::new("xclip")
            .arg("-version")
            .output()
            .context("xclip not found. Install the xclip package")?;

        log::debug!("X11Backend initialized successfully");
        Ok(X11Backend)
    }

    fn copy(&self, data: &[u8], target: &str) -> Result<()> {
        // xclip forks to serve the selection, so wait only for the parent
        let mut child = Command::new("xclip")
            .args(["-selection", "clipboard", "-target", target, "-in"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn xclip")?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(data)
                .context("Failed to write to xclip stdin")?;
        }

        let status = child.wait().context("Failed to wait for xclip")?;
        if !status.success() {
            return Err(anyhow!("xclip failed with status: {}", status));
        }

        log::debug!("Wrote {} bytes of {} to clipboard", data.len(), target);
        Ok(())
    }
}

impl ClipboardBackend for X11Backend {
    fn write_text(&self, text: &str) -> Result<()> {
        self.copy(text.as_bytes(), "UTF8_STRING")
    }

    fn write_image(&self, data: &[u8], mime_type: &str) -> Result<()> {
        self.copy(data, mime_type)
    }

    fn write_files(&self, uri_list: &str) -> Result<()> {
        self.copy(uri_list.as_bytes(), "text/uri-list")
    }

    fn name(&self) -> &'static str {
        "X11"
    }
}
