//! Domain types for the tubemark library.
//!
//! This module contains the core data structures:
//! - Library: the aggregate root, the unit of validation and persistence
//! - Video: a bookmarked external video, keyed by the platform's own id
//! - Note: a timestamped annotation owned by one video
//! - Tag: a named label referenced by id from videos

pub mod library;
pub mod note;
pub mod tag;
pub mod video;

// Re-export commonly used types
pub use library::{Library, ValidationError};
pub use note::Note;
pub use tag::Tag;
pub use video::Video;
