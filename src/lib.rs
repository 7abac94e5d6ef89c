//! tubemark - Personal video bookmarking with timestamped notes and tags
//!
//! Catalogs external video references in a single local JSON document.
//! Each bookmark is keyed by the platform's own video id (which is what
//! makes adding the same video twice a detectable duplicate), carries
//! timestamped notes, and references shared tags by id.
//!
//! The design is read-validate-commit: every mutation computes a whole
//! new library aggregate, validates it against the schema, and only then
//! replaces the in-memory state and the storage slot in lockstep. A
//! rejected mutation changes nothing.
//!
//! # Modules
//!
//! - `domain`: Data structures (Library, Video, Note, Tag) and validation
//! - `storage`: Persistence gateway between the library and its slot
//! - `store`: The mutation API, the only way to change the library
//! - `youtube`: Video id and timestamp extraction from YouTube URLs
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Bookmark a video (id and start position come from the URL)
//! tubemark add "https://youtu.be/dQw4w9WgXcQ?t=1m30s" --title "Classic"
//!
//! # Annotate it
//! tubemark note add dQw4w9WgXcQ 90 "the good part"
//!
//! # See everything
//! tubemark list
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod storage;
pub mod store;
pub mod youtube;

// Re-export main types at crate root for convenience
pub use domain::{Library, Note, Tag, ValidationError, Video};
pub use storage::{FileSlot, MemorySlot, Slot, Storage};
pub use store::{AddedVideo, LibraryStore, NewVideo, NoteUpdate, StoreError, VideoUpdate};
pub use youtube::VideoRef;
