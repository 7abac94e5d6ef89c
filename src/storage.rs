//! Durable storage for the library.
//!
//! The whole library lives in one named slot of a local key-value medium,
//! written as a single pretty-printed JSON document. Loading is a total
//! function: an absent slot, unreadable text, or contents that fail schema
//! validation all fall back to the empty library (logged, never raised).
//! Saving validates first and swallows write failures after logging them;
//! callers decide what to do with their in-memory copy.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::error;

use crate::domain::Library;

/// A single named slot in a local, string-keyed storage medium.
///
/// Reads and writes are whole-value; the medium is assumed to make a single
/// write call atomic for values of this size.
pub trait Slot {
    /// Read the slot's contents; `None` when nothing was ever written
    fn read(&self) -> Result<Option<String>>;

    /// Replace the slot's contents in a single write
    fn write(&self, value: &str) -> Result<()>;

    /// Slot name for log messages
    fn describe(&self) -> String;
}

/// Slot backed by one file on disk
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        Ok(Some(text))
    }

    fn write(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(&self.path, value)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory slot, used by tests and throwaway sessions
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        // A poisoned lock still holds a usable value
        let value = self.value.lock().unwrap_or_else(|e| e.into_inner());
        Ok(value.clone())
    }

    fn write(&self, value: &str) -> Result<()> {
        let mut slot = self.value.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(value.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Load/save boundary between the in-memory library and its storage slot
pub struct Storage {
    slot: Box<dyn Slot>,
}

impl Storage {
    /// Wrap an arbitrary slot
    pub fn new(slot: impl Slot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    /// Storage over the default on-disk slot (<data_dir>/library.json)
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(FileSlot::new(crate::config::library_file()?)))
    }

    /// Storage over a fresh in-memory slot
    pub fn in_memory() -> Self {
        Self::new(MemorySlot::new())
    }

    /// Load the library from the slot.
    ///
    /// Never fails: any read, parse, or validation problem is logged and
    /// replaced with the empty library.
    pub fn load(&self) -> Library {
        let text = match self.slot.read() {
            Ok(Some(text)) => text,
            Ok(None) => return Library::default(),
            Err(e) => {
                error!("Failed to read {}: {:#}", self.slot.describe(), e);
                return Library::default();
            }
        };

        let library: Library = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Stored library is not valid JSON, starting empty: {}", e);
                return Library::default();
            }
        };

        if let Err(e) = library.validate() {
            error!("Stored library failed validation, starting empty: {}", e);
            return Library::default();
        }

        library
    }

    /// Save the library to the slot.
    ///
    /// Validates first; an invalid library is never written. Failures are
    /// logged and swallowed, so after a failed write the slot may lag the
    /// caller's in-memory state until the next successful save.
    pub fn save(&self, library: &Library) {
        if let Err(e) = library.validate() {
            error!("Refusing to save invalid library: {}", e);
            return;
        }

        let text = match serde_json::to_string_pretty(library) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to serialize library: {}", e);
                return;
            }
        };

        if let Err(e) = self.slot.write(&text) {
            error!("Failed to write {}: {:#}", self.slot.describe(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Video;

    #[test]
    fn test_load_empty_slot_returns_empty_library() {
        let storage = Storage::in_memory();
        assert_eq!(storage.load(), Library::default());
    }

    #[test]
    fn test_load_corrupt_json_returns_empty_library() {
        let slot = MemorySlot::new();
        slot.write("{not json at all").unwrap();

        let storage = Storage::new(slot);
        assert_eq!(storage.load(), Library::default());
    }

    #[test]
    fn test_load_schema_invalid_data_returns_empty_library() {
        let slot = MemorySlot::new();
        // Parses as JSON but violates the schema (empty title)
        slot.write(
            r#"{"videos": [{"id": "abcdefghijk", "url": "https://youtu.be/abcdefghijk",
                "title": "", "createdAt": 1, "updatedAt": 1}], "tags": []}"#,
        )
        .unwrap();

        let storage = Storage::new(slot);
        assert_eq!(storage.load(), Library::default());
    }

    #[test]
    fn test_memory_slot_usable_after_poisoning() {
        use std::sync::Arc;

        let slot = Arc::new(MemorySlot::new());
        slot.write("before").unwrap();

        // Panic while holding the lock to poison it
        let poisoner = Arc::clone(&slot);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.value.lock().unwrap();
            panic!("poisoning the slot");
        })
        .join();

        assert_eq!(slot.read().unwrap().as_deref(), Some("before"));
        slot.write("after").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let storage = Storage::in_memory();
        let library = Library {
            videos: vec![Video::new(
                "dQw4w9WgXcQ",
                "https://youtu.be/dQw4w9WgXcQ",
                "Test Video",
            )
            .with_duration(100.0)],
            tags: vec![],
        };

        storage.save(&library);
        assert_eq!(storage.load(), library);
    }

    #[test]
    fn test_invalid_library_is_not_written() {
        let storage = Storage::in_memory();

        let mut invalid = Library::default();
        invalid
            .videos
            .push(Video::new("abcdefghijk", "https://youtu.be/abcdefghijk", ""));
        storage.save(&invalid);

        // The slot still reads back as empty
        assert_eq!(storage.load(), Library::default());
    }
}
