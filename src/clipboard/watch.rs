use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Clipboard content streams watched by `listen`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Text,
    Image,
    Files,
}

impl WatchKind {
    pub const ALL: [WatchKind; 3] = [WatchKind::Text, WatchKind::Image, WatchKind::Files];

    /// Mime type passed to `wl-paste --type`
    pub fn mime_type(&self) -> &'static str {
        match self {
            WatchKind::Text => "text",
            WatchKind::Image => "image/png",
            WatchKind::Files => "text/uri-list",
        }
    }

    /// Subcommand the watcher invokes with the new content on stdin
    pub fn store_command(&self) -> &'static str {
        match self {
            WatchKind::Text => "store-text",
            WatchKind::Image => "store-image",
            WatchKind::Files => "store-files",
        }
    }
}

/// Arguments for `wl-paste`: `--type <mime> --watch <exe> store-<kind>`
pub fn watcher_args(kind: WatchKind, exe: &Path) -> Vec<OsString> {
    vec![
        "--type".into(),
        kind.mime_type().into(),
        "--watch".into(),
        exe.as_os_str().to_owned(),
        kind.store_command().into(),
    ]
}

/// Start a detached `wl-paste --watch` process for one content kind
/// Uses process_group(0) so the watcher outlives the terminal that started it
pub fn start_watcher(kind: WatchKind) -> Result<()> {
    log::info!("Starting {:?} clipboard watcher", kind);

    let exe = std::env::current_exe().context("Failed to get current executable path")?;

    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .context("Failed to open /dev/null")?;

    Command::new("wl-paste")
        .args(watcher_args(kind, &exe))
        .stdin(Stdio::null())
        .stdout(dev_null.try_clone()?)
        .stderr(dev_null)
        .process_group(0)
        .spawn()
        .with_context(|| format!("Failed to spawn {:?} clipboard watcher", kind))?;

    log::info!("{:?} clipboard watcher started in background", kind);
    Ok(())
}

/// Start watchers for every content kind
pub fn start_all() -> Result<()> {
    for kind in WatchKind::ALL {
        start_watcher(kind)?;
    }
    Ok(())
}
