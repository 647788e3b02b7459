use bincode::{Decode, Encode};
use std::collections::{HashMap, hash_map::DefaultHasher};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::SystemTime;
use unicode_width::UnicodeWidthChar;

/// Kind of clipboard content, used for filtering and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKind {
    Text,
    Image,
    Files,
}

impl ClipKind {
    /// Short uppercase label shown in lists
    pub fn label(&self) -> &'static str {
        match self {
            ClipKind::Text => "TEXT",
            ClipKind::Image => "IMAGE",
            ClipKind::Files => "FILES",
        }
    }
}

/// Errors raised while turning raw clipboard bytes into content
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("clipboard content is empty")]
    Empty,

    #[error("clipboard text is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("image is {size} bytes, larger than the {max} byte limit")]
    ImageTooLarge { size: u64, max: u64 },

    #[error("uri list contains no local files")]
    NoFiles,
}

/// Content type for clipboard entries
#[derive(Debug, Clone, Encode, Decode, PartialEq)]
pub enum ClipContent {
    /// Text content with UTF-8 string
    Text(String),
    /// Image bytes as delivered by the clipboard
    Image { data: Vec<u8>, mime_type: String },
    /// Files copied from a file manager (text/uri-list)
    Files(Vec<PathBuf>),
}

impl ClipContent {
    /// Build text content, rejecting invalid UTF-8 and blank text
    pub fn text_from_bytes(bytes: Vec<u8>) -> Result<Self, ContentError> {
        let text = String::from_utf8(bytes)?;
        if text.trim().is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(ClipContent::Text(text))
    }

    /// Build image content, enforcing the configured size limit
    pub fn image_from_bytes(
        data: Vec<u8>,
        mime_type: &str,
        max_size: u64,
    ) -> Result<Self, ContentError> {
        if data.is_empty() {
            return Err(ContentError::Empty);
        }
        let size = data.len() as u64;
        if size > max_size {
            return Err(ContentError::ImageTooLarge {
                size,
                max: max_size,
            });
        }
        Ok(ClipContent::Image {
            data,
            mime_type: mime_type.to_string(),
        })
    }

    /// Build a file list from a text/uri-list payload
    ///
    /// Comment lines are skipped and only `file://` URIs are kept.
    pub fn files_from_uri_list(bytes: Vec<u8>) -> Result<Self, ContentError> {
        let list = String::from_utf8(bytes)?;
        let paths: Vec<PathBuf> = list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(parse_file_uri)
            .collect();

        if paths.is_empty() {
            return Err(ContentError::NoFiles);
        }
        Ok(ClipContent::Files(paths))
    }

    pub fn kind(&self) -> ClipKind {
        match self {
            ClipContent::Text(_) => ClipKind::Text,
            ClipContent::Image { .. } => ClipKind::Image,
            ClipContent::Files(_) => ClipKind::Files,
        }
    }

    /// Get a single-line preview no wider than `max_width` terminal columns
    pub fn preview(&self, max_width: usize) -> String {
        match self {
            ClipContent::Text(text) => {
                let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
                truncate_to_width(first.trim(), max_width)
            }
            ClipContent::Image { mime_type, data } => {
                format!("[Image: {} ({} bytes)]", mime_type, data.len())
            }
            ClipContent::Files(paths) => {
                let first = paths
                    .first()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".to_string());
                let label = if paths.len() > 1 {
                    format!("[Files: {} +{}]", first, paths.len() - 1)
                } else {
                    format!("[File: {}]", first)
                };
                truncate_to_width(&label, max_width)
            }
        }
    }

    /// Get content hash for deduplication
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind().hash(&mut hasher);
        match self {
            ClipContent::Text(text) => text.hash(&mut hasher),
            ClipContent::Image { data, mime_type } => {
                data.hash(&mut hasher);
                mime_type.hash(&mut hasher);
            }
            ClipContent::Files(paths) => paths.hash(&mut hasher),
        }
        hasher.finish()
    }

    /// Size of the stored payload in bytes
    pub fn size(&self) -> usize {
        match self {
            ClipContent::Text(text) => text.len(),
            ClipContent::Image { data, .. } => data.len(),
            ClipContent::Files(paths) => paths.iter().map(|p| p.as_os_str().len()).sum(),
        }
    }
}

fn parse_file_uri(line: &str) -> Option<PathBuf> {
    let rest = line.strip_prefix("file://")?;
    // file://host/path: only local (empty or localhost) hosts are usable
    let path = if rest.starts_with('/') {
        rest
    } else {
        rest.strip_prefix("localhost")?
    };
    let decoded = urlencoding::decode(path).ok()?;
    Some(PathBuf::from(decoded.into_owned()))
}

/// Truncate to a display width, appending "..." when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// A single clipboard entry with metadata
#[derive(Debug, Clone, Encode, Decode, PartialEq)]
pub struct ClipEntry {
    /// Unique identifier (monotonic counter)
    pub id: u64,
    pub content: ClipContent,
    /// When this entry was last seen (updated on duplicate)
    pub timestamp: SystemTime,
    /// Pinned entries are exempt from history rotation
    pub pinned: bool,
    pub content_hash: u64,
}

impl ClipEntry {
    pub fn new(id: u64, content: ClipContent) -> Self {
        let content_hash = content.content_hash();
        ClipEntry {
            id,
            content,
            timestamp: SystemTime::now(),
            pinned: false,
            content_hash,
        }
    }

    pub fn preview(&self, max_width: usize) -> String {
        self.content.preview(max_width)
    }

    pub fn kind(&self) -> ClipKind {
        self.content.kind()
    }

    pub fn toggle_pin(&mut self) {
        self.pinned = !self.pinned;
    }

    /// Update timestamp (used when duplicate is seen)
    pub fn bump_timestamp(&mut self) {
        self.timestamp = SystemTime::now();
    }

    /// Paths in a file entry that no longer exist
    pub fn missing_files(&self) -> Vec<&PathBuf> {
        match &self.content {
            ClipContent::Files(paths) => paths.iter().filter(|p| !p.exists()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Clipboard history manager
/// Entries are kept in timestamp order (most recent first)
#[derive(Debug, Clone)]
pub struct ClipboardHistory {
    entries: Vec<ClipEntry>,
    /// Maximum number of unpinned entries to keep, never below 1
    max_entries: usize,
    next_id: u64,
    /// content_hash -> entry id, derived from entries and never persisted
    hash_to_id: HashMap<u64, u64>,
}

impl ClipboardHistory {
    pub fn new(max_entries: usize) -> Self {
        ClipboardHistory {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
            next_id: 1,
            hash_to_id: HashMap::new(),
        }
    }

    /// Rebuild a history from persisted entries, recomputing the duplicate
    /// index and applying the rotation limit
    pub fn from_parts(entries: Vec<ClipEntry>, max_entries: usize, next_id: u64) -> Self {
        let mut history = ClipboardHistory {
            entries,
            max_entries: max_entries.max(1),
            next_id: next_id.max(1),
            hash_to_id: HashMap::new(),
        };
        history.rebuild_hash_map();
        history.rotate_history();
        history
    }

    /// Recompute hashes and the duplicate index
    fn rebuild_hash_map(&mut self) {
        self.hash_to_id.clear();
        for entry in &mut self.entries {
            entry.content_hash = entry.content.content_hash();
            self.hash_to_id.insert(entry.content_hash, entry.id);
        }
        if let Some(max_id) = self.entries.iter().map(|e| e.id).max()
            && max_id >= self.next_id
        {
            self.next_id = max_id + 1;
        }
    }

    /// Add a new entry to the history
    /// If content is duplicate, updates timestamp and moves to front
    /// Returns the ID of the entry (existing or new)
    pub fn add_entry(&mut self, content: ClipContent) -> u64 {
        let content_hash = content.content_hash();

        if let Some(&existing_id) = self.hash_to_id.get(&content_hash)
            && let Some(pos) = self.entries.iter().position(|e| e.id == existing_id)
        {
            log::debug!(
                "Duplicate detected, bumping timestamp for entry {}",
                existing_id
            );
            let mut entry = self.entries.remove(pos);
            entry.bump_timestamp();
            self.entries.insert(0, entry);
            return existing_id;
        }

        let id = self.next_id;
        self.next_id += 1;

        self.hash_to_id.insert(content_hash, id);
        self.entries.insert(0, ClipEntry::new(id, content));

        self.rotate_history();

        id
    }

    /// Remove an entry by ID
    pub fn remove_entry(&mut self, id: u64) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            let entry = self.entries.remove(pos);
            self.hash_to_id.remove(&entry.content_hash);
            true
        } else {
            false
        }
    }

    /// Toggle pin of an entry, returning the new pin state
    pub fn toggle_pin(&mut self, id: u64) -> Option<bool> {
        let entry = self.get_entry_mut(id)?;
        entry.toggle_pin();
        let pinned = entry.pinned;
        if !pinned {
            // Unpinning may push the unpinned count past the limit
            self.rotate_history();
        }
        Some(pinned)
    }

    pub fn get_entry(&self, id: u64) -> Option<&ClipEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_entry_mut(&mut self, id: u64) -> Option<&mut ClipEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Clear all non-pinned entries, returning how many were removed
    pub fn clear_unpinned(&mut self) -> usize {
        let before = self.entries.len();
        let hash_to_id = &mut self.hash_to_id;
        self.entries.retain(|e| {
            if e.pinned {
                true
            } else {
                hash_to_id.remove(&e.content_hash);
                false
            }
        });
        before - self.entries.len()
    }

    /// Change the rotation limit, dropping surplus entries immediately
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries.max(1);
        self.rotate_history();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Enforce max_entries, dropping the oldest unpinned entries first
    fn rotate_history(&mut self) {
        let unpinned = self.entries.iter().filter(|e| !e.pinned).count();
        if unpinned <= self.max_entries {
            return;
        }

        // Entries are newest first, so keep the first max_entries unpinned ones
        let mut kept = 0;
        let max_entries = self.max_entries;
        let hash_to_id = &mut self.hash_to_id;
        self.entries.retain(|e| {
            if e.pinned {
                return true;
            }
            if kept < max_entries {
                kept += 1;
                true
            } else {
                hash_to_id.remove(&e.content_hash);
                false
            }
        });
    }

    /// Id the next new entry will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ClipContent {
        ClipContent::Text(s.to_string())
    }

    #[test]
    fn test_clip_content_preview() {
        let content = text("Hello, world!");
        assert_eq!(content.preview(10), "Hello, ...");
        assert_eq!(content.preview(50), "Hello, world!");

        let image = ClipContent::Image {
            data: vec![0; 100],
            mime_type: "image/png".to_string(),
        };
        assert_eq!(image.preview(50), "[Image: image/png (100 bytes)]");

        let files = ClipContent::Files(vec![
            PathBuf::from("/tmp/report.pdf"),
            PathBuf::from("/tmp/notes.txt"),
        ]);
        assert_eq!(files.preview(50), "[Files: report.pdf +1]");
    }

    #[test]
    fn test_preview_skips_blank_lines_and_handles_wide_chars() {
        let content = text("\n\n  第一行内容\nsecond");
        assert_eq!(content.preview(100), "第一行内容");
        // Each CJK char is two columns wide
        assert_eq!(content.preview(7), "第一...");
    }

    #[test]
    fn test_text_from_bytes_rejects_blank_and_invalid() {
        assert!(matches!(
            ClipContent::text_from_bytes(b"   \n".to_vec()),
            Err(ContentError::Empty)
        ));
        assert!(matches!(
            ClipContent::text_from_bytes(vec![0xff, 0xfe]),
            Err(ContentError::InvalidUtf8(_))
        ));
        assert_eq!(
            ClipContent::text_from_bytes(b"hi".to_vec()).unwrap(),
            text("hi")
        );
    }

    #[test]
    fn test_image_size_limit() {
        let err = ClipContent::image_from_bytes(vec![1; 11], "image/png", 10).unwrap_err();
        assert!(matches!(err, ContentError::ImageTooLarge { size: 11, max: 10 }));
        assert!(ClipContent::image_from_bytes(vec![1; 10], "image/png", 10).is_ok());
    }

    #[test]
    fn test_uri_list_parsing() {
        let list = b"# copied by nautilus\r\nfile:///home/me/My%20Doc.txt\r\nhttps://example.com/x\r\nfile://localhost/tmp/a.png\r\n";
        let content = ClipContent::files_from_uri_list(list.to_vec()).unwrap();
        assert_eq!(
            content,
            ClipContent::Files(vec![
                PathBuf::from("/home/me/My Doc.txt"),
                PathBuf::from("/tmp/a.png"),
            ])
        );

        let remote_only = b"https://example.com\nfile://otherhost/x".to_vec();
        assert!(matches!(
            ClipContent::files_from_uri_list(remote_only),
            Err(ContentError::NoFiles)
        ));
    }

    #[test]
    fn test_same_bytes_different_kind_hash_differently() {
        let t = text("/tmp/a");
        let f = ClipContent::Files(vec![PathBuf::from("/tmp/a")]);
        assert_ne!(t.content_hash(), f.content_hash());
    }

    #[test]
    fn test_duplicate_bumps_timestamp() {
        let mut history = ClipboardHistory::new(10);

        let id1 = history.add_entry(text("test"));
        history.add_entry(text("other"));

        assert_eq!(history.entries()[1].id, id1);

        let id2 = history.add_entry(text("test"));

        assert_eq!(id1, id2);
        assert_eq!(history.entries()[0].id, id1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_rotation_drops_oldest_unpinned() {
        let mut history = ClipboardHistory::new(2);

        let first = history.add_entry(text("one"));
        let second = history.add_entry(text("two"));
        let third = history.add_entry(text("three"));

        assert_eq!(history.len(), 2);
        assert!(history.get_entry(first).is_none());
        assert!(history.get_entry(second).is_some());
        assert!(history.get_entry(third).is_some());

        // Rotated content is new again, not a duplicate
        let again = history.add_entry(text("one"));
        assert_ne!(again, first);
    }

    #[test]
    fn test_pinned_entries_exempt_from_rotation() {
        let mut history = ClipboardHistory::new(2);

        let pinned = history.add_entry(text("Entry 1"));
        assert_eq!(history.toggle_pin(pinned), Some(true));

        history.add_entry(text("Entry 2"));
        history.add_entry(text("Entry 3"));
        history.add_entry(text("Entry 4"));

        // 1 pinned + 2 unpinned (max)
        assert_eq!(history.len(), 3);
        assert!(history.get_entry(pinned).is_some());

        // Unpinning re-applies the limit
        assert_eq!(history.toggle_pin(pinned), Some(false));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear_unpinned_and_remove() {
        let mut history = ClipboardHistory::new(10);
        let keep = history.add_entry(text("keep"));
        let gone = history.add_entry(text("gone"));
        history.add_entry(text("also gone"));
        history.toggle_pin(keep);

        assert_eq!(history.clear_unpinned(), 2);
        assert_eq!(history.len(), 1);
        assert!(history.get_entry(gone).is_none());

        assert!(history.remove_entry(keep));
        assert!(!history.remove_entry(keep));
        assert!(history.is_empty());
    }

    #[test]
    fn test_rebuild_restores_dedup_and_ids() {
        let mut history = ClipboardHistory::new(10);
        let id = history.add_entry(text("a"));
        history.add_entry(text("b"));

        history.hash_to_id.clear();
        history.next_id = 1;
        history.rebuild_hash_map();

        assert_eq!(history.add_entry(text("a")), id);
        assert_eq!(history.add_entry(text("c")), 3);
    }

    #[test]
    fn test_from_parts_rebuilds_index_and_ids() {
        let mut original = ClipboardHistory::new(10);
        let a = original.add_entry(text("a"));
        original.add_entry(text("b"));

        // A stale counter is moved past the highest stored id
        let mut history = ClipboardHistory::from_parts(original.entries().to_vec(), 10, 1);
        assert_eq!(history.next_id(), 3);
        assert_eq!(history.add_entry(text("a")), a);
        assert_eq!(history.len(), 2);
        assert_eq!(history.add_entry(text("c")), 3);
    }

    #[test]
    fn test_zero_limit_still_keeps_newest_clip() {
        let mut history = ClipboardHistory::new(0);
        assert_eq!(history.max_entries(), 1);

        let first = history.add_entry(text("first"));
        assert_eq!(history.entries()[0].id, first);
        let second = history.add_entry(text("second"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].id, second);

        history.set_max_entries(0);
        assert_eq!(history.max_entries(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_set_max_entries_shrinks() {
        let mut history = ClipboardHistory::new(5);
        for i in 0..5 {
            history.add_entry(text(&i.to_string()));
        }
        history.set_max_entries(3);
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0].content, text("4"));
    }
}
