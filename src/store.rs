use anyhow::Result;

use crate::clipboard::watch::WatchKind;
use crate::models::{ClipContent, ContentError};
use crate::storage::{Config, HistoryStorage};

/// What happened to a piece of clipboard content handed to `store_clip`
#[derive(Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored(u64),
    /// Tracking is switched off in the configuration
    TrackingDisabled,
    /// Content was unusable and has been dropped
    Rejected(String),
}

/// Turn raw clipboard bytes into content according to the intake rules
pub fn parse_content(
    kind: WatchKind,
    bytes: Vec<u8>,
    config: &Config,
) -> Result<ClipContent, ContentError> {
    match kind {
        WatchKind::Text => ClipContent::text_from_bytes(bytes),
        WatchKind::Image => ClipContent::image_from_bytes(
            bytes,
            kind.mime_type(),
            config.general.max_image_size_bytes,
        ),
        WatchKind::Files => ClipContent::files_from_uri_list(bytes),
    }
}

/// Record clipboard content read from a watcher into the persisted history
pub fn store_clip(
    kind: WatchKind,
    bytes: Vec<u8>,
    config: &Config,
    storage: &dyn HistoryStorage,
) -> Result<StoreOutcome> {
    if !config.general.track_changes {
        log::debug!("Tracking disabled, ignoring {:?} clip", kind);
        return Ok(StoreOutcome::TrackingDisabled);
    }

    let content = match parse_content(kind, bytes, config) {
        Ok(content) => content,
        Err(e @ (ContentError::Empty | ContentError::NoFiles)) => {
            log::debug!("Empty {:?} clip, skipping", kind);
            return Ok(StoreOutcome::Rejected(e.to_string()));
        }
        Err(e) => {
            log::warn!("Rejected {:?} clip: {}", kind, e);
            return Ok(StoreOutcome::Rejected(e.to_string()));
        }
    };

    // Watchers for each content type run their own store process
    let _lock = storage.lock()?;
    let mut history = storage.load()?;
    let clip_id = history.add_entry(content);
    storage.save(&history)?;

    log::info!("Stored clip {} ({:?})", clip_id, kind);
    Ok(StoreOutcome::Stored(clip_id))
}
