use anyhow::{Context, Result};
use bincode::{Decode, Encode};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::models::{ClipEntry, ClipboardHistory};

/// Trait for clipboard history persistence
pub trait HistoryStorage: Send + Sync {
    /// Load clipboard history from storage
    fn load(&self) -> Result<ClipboardHistory>;

    /// Save clipboard history to storage
    fn save(&self, history: &ClipboardHistory) -> Result<()>;

    /// Take the exclusive writer lock, held until the guard is dropped
    fn lock(&self) -> Result<HistoryLock>;

    /// Get the storage file path
    fn path(&self) -> &PathBuf;
}

/// Exclusive advisory lock on the history's sidecar `.lock` file
#[derive(Debug)]
pub struct HistoryLock {
    file: File,
}

impl Drop for HistoryLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            log::warn!("Failed to release history lock: {}", e);
        }
    }
}

/// On-disk layout: only what cannot be derived from the entries
#[derive(Encode)]
struct HistoryFileRef<'a> {
    entries: &'a [ClipEntry],
    max_entries: usize,
    next_id: u64,
}

#[derive(Decode)]
struct HistoryFile {
    entries: Vec<ClipEntry>,
    #[allow(dead_code)]
    max_entries: usize,
    next_id: u64,
}

/// Bincode-based implementation of HistoryStorage
/// Writes go through a uniquely named temp file that is renamed over the target
pub struct BincodeHistoryStorage {
    path: PathBuf,
    max_entries: usize,
}

impl BincodeHistoryStorage {
    /// `max_entries` is applied to every loaded history, so a lowered
    /// limit in the config takes effect on the next load
    pub fn new(path: PathBuf, max_entries: usize) -> Self {
        BincodeHistoryStorage { path, max_entries }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        Ok(())
    }
}

impl HistoryStorage for BincodeHistoryStorage {
    fn load(&self) -> Result<ClipboardHistory> {
        if !self.path.exists() {
            log::info!(
                "History file not found at {:?}, creating new history with max {} entries",
                self.path,
                self.max_entries
            );
            return Ok(ClipboardHistory::new(self.max_entries));
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read history from {:?}", self.path))?;

        match bincode::decode_from_slice::<HistoryFile, _>(&bytes, bincode::config::standard()) {
            Ok((file, _bytes_read)) => {
                let history =
                    ClipboardHistory::from_parts(file.entries, self.max_entries, file.next_id);
                log::info!("Loaded {} clips from {:?}", history.len(), self.path);
                Ok(history)
            }
            Err(e) => {
                // Corrupted file - backup and return empty history
                let backup_path = self.path.with_extension("bin.corrupted");
                log::warn!(
                    "History file corrupted, backing up to {:?}: {}",
                    backup_path,
                    e
                );

                if let Err(backup_err) = fs::rename(&self.path, &backup_path) {
                    log::error!("Failed to backup corrupted file: {}", backup_err);
                }

                Ok(ClipboardHistory::new(self.max_entries))
            }
        }
    }

    fn save(&self, history: &ClipboardHistory) -> Result<()> {
        let file = HistoryFileRef {
            entries: history.entries(),
            max_entries: history.max_entries(),
            next_id: history.next_id(),
        };
        let bytes = bincode::encode_to_vec(&file, bincode::config::standard())
            .context("Failed to serialize clipboard history")?;

        self.ensure_parent()?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        tmp.write_all(&bytes)
            .with_context(|| format!("Failed to write to temporary file {:?}", tmp.path()))?;

        // Atomic rename so concurrent readers never see a partial file
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;

        log::debug!("Saved {} clips to {:?}", history.len(), self.path);

        Ok(())
    }

    fn lock(&self) -> Result<HistoryLock> {
        self.ensure_parent()?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;
        file.lock()
            .with_context(|| format!("Failed to lock {:?}", lock_path))?;
        Ok(HistoryLock { file })
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClipContent;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_gives_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BincodeHistoryStorage::new(dir.path().join("history.bin"), 7);
        let history = storage.load().unwrap();
        assert!(history.is_empty());
        assert_eq!(history.max_entries(), 7);
    }

    #[test]
    fn test_save_then_load_keeps_entries_and_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BincodeHistoryStorage::new(dir.path().join("history.bin"), 10);

        let mut history = ClipboardHistory::new(10);
        let text_id = history.add_entry(ClipContent::Text("hello".into()));
        history.add_entry(ClipContent::Files(vec![PathBuf::from("/tmp/a b.txt")]));
        history.toggle_pin(text_id);
        storage.save(&history).unwrap();
        // Only the history file remains, no leftover temp files
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("history.bin")]);

        let mut loaded = storage.load().unwrap();
        assert_eq!(loaded.entries(), history.entries());
        assert!(loaded.get_entry(text_id).unwrap().pinned);

        // Dedup index survives the round trip
        assert_eq!(loaded.add_entry(ClipContent::Text("hello".into())), text_id);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_load_applies_configured_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.bin");

        let mut history = ClipboardHistory::new(10);
        for i in 0..6 {
            history.add_entry(ClipContent::Text(format!("clip {}", i)));
        }
        BincodeHistoryStorage::new(path.clone(), 10)
            .save(&history)
            .unwrap();

        let loaded = BincodeHistoryStorage::new(path, 4).load().unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.max_entries(), 4);
    }

    #[test]
    fn test_concurrent_saves_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BincodeHistoryStorage::new(dir.path().join("history.bin"), 10);
        let barrier = std::sync::Barrier::new(8);

        std::thread::scope(|scope| {
            for i in 0..8 {
                let storage = &storage;
                let barrier = &barrier;
                scope.spawn(move || {
                    let mut history = ClipboardHistory::new(10);
                    history.add_entry(ClipContent::Text(format!("writer {}", i)));
                    barrier.wait();
                    for _ in 0..20 {
                        storage.save(&history).unwrap();
                    }
                });
            }
        });

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!dir.path().join("history.bin.corrupted").exists());
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BincodeHistoryStorage::new(dir.path().join("history.bin"), 10);

        let guard = storage.lock().unwrap();
        let other = File::options()
            .write(true)
            .open(dir.path().join("history.lock"))
            .unwrap();
        assert!(other.try_lock().is_err());

        drop(guard);
        assert!(other.try_lock().is_ok());
    }

    #[test]
    fn test_saved_file_omits_duplicate_index() {
        let dir = tempfile::tempdir().unwrap();
        let storage = BincodeHistoryStorage::new(dir.path().join("history.bin"), 10);

        let mut history = ClipboardHistory::new(10);
        history.add_entry(ClipContent::Text("a".into()));
        history.add_entry(ClipContent::Text("b".into()));
        storage.save(&history).unwrap();

        let bytes = fs::read(storage.path()).unwrap();
        let (file, read): (HistoryFile, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard()).unwrap();
        // Nothing trails the entries, limit and id counter
        assert_eq!(read, bytes.len());
        assert_eq!(file.entries.len(), 2);
        assert_eq!(file.next_id, 3);
    }

    #[test]
    fn test_corrupted_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.bin");
        // One entry announced, then the data ends
        fs::write(&path, [0x01u8]).unwrap();

        let storage = BincodeHistoryStorage::new(path.clone(), 10);
        let history = storage.load().unwrap();

        assert!(history.is_empty());
        assert!(!path.exists());
        assert!(dir.path().join("history.bin.corrupted").exists());
    }
}
