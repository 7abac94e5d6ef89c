//! The library aggregate and its validation rules.
//!
//! The whole library is the unit of persistence: every mutation computes a
//! new aggregate, validates it here, and writes it back as one value. The
//! same check runs against anything read from storage, so stale or corrupt
//! data never reaches callers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::{Tag, Video};

/// Constraint violations reported by [`Library::validate`]
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tag {id} has an empty name")]
    EmptyTagName { id: String },

    #[error("duplicate tag id: {id}")]
    DuplicateTagId { id: String },

    #[error("video {id} has an empty title")]
    EmptyTitle { id: String },

    #[error("video {id} has a malformed url: {url}")]
    MalformedUrl { id: String, url: String },

    #[error("video {id} has a malformed thumbnail url: {url}")]
    MalformedThumbnail { id: String, url: String },

    #[error("video {id} has a negative duration")]
    NegativeDuration { id: String },

    #[error("duplicate video id: {id}")]
    DuplicateVideoId { id: String },

    #[error("note {note_id} has empty content")]
    EmptyNoteContent { note_id: String },

    #[error("note {note_id} has a negative timestamp")]
    NegativeNoteTimestamp { note_id: String },

    #[error("note {note_id} names owner {owner} but is stored under video {video_id}")]
    NoteOwnerMismatch {
        note_id: String,
        owner: String,
        video_id: String,
    },
}

/// The full collection of videos and tags.
///
/// Videos keep insertion order with the newest first; tags keep creation
/// order. Missing collections deserialize to empty ones, which is the only
/// coercion the schema performs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// All bookmarked videos, newest first
    #[serde(default)]
    pub videos: Vec<Video>,

    /// All tags, in creation order
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Library {
    /// Check every structural and semantic constraint on the aggregate.
    ///
    /// Non-mutating: reports the first violation found rather than coercing
    /// data. Called on every load and before every save.
    ///
    /// Deliberately not checked: `updated_at >= created_at`, and tag-name
    /// uniqueness (duplicate names are rejected at the mutation layer on
    /// add, but a rename may collide).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut tag_ids = HashSet::new();
        for tag in &self.tags {
            if tag.name.is_empty() {
                return Err(ValidationError::EmptyTagName { id: tag.id.clone() });
            }
            if !tag_ids.insert(tag.id.as_str()) {
                return Err(ValidationError::DuplicateTagId { id: tag.id.clone() });
            }
        }

        let mut video_ids = HashSet::new();
        for video in &self.videos {
            if video.title.is_empty() {
                return Err(ValidationError::EmptyTitle {
                    id: video.id.clone(),
                });
            }
            if Url::parse(&video.url).is_err() {
                return Err(ValidationError::MalformedUrl {
                    id: video.id.clone(),
                    url: video.url.clone(),
                });
            }
            if let Some(thumbnail) = &video.thumbnail {
                if Url::parse(thumbnail).is_err() {
                    return Err(ValidationError::MalformedThumbnail {
                        id: video.id.clone(),
                        url: thumbnail.clone(),
                    });
                }
            }
            if video.duration.is_some_and(|d| d < 0.0) {
                return Err(ValidationError::NegativeDuration {
                    id: video.id.clone(),
                });
            }
            if !video_ids.insert(video.id.as_str()) {
                return Err(ValidationError::DuplicateVideoId {
                    id: video.id.clone(),
                });
            }

            for note in &video.notes {
                if note.content.is_empty() {
                    return Err(ValidationError::EmptyNoteContent {
                        note_id: note.id.clone(),
                    });
                }
                if note.timestamp < 0.0 {
                    return Err(ValidationError::NegativeNoteTimestamp {
                        note_id: note.id.clone(),
                    });
                }
                if note.video_id != video.id {
                    return Err(ValidationError::NoteOwnerMismatch {
                        note_id: note.id.clone(),
                        owner: note.video_id.clone(),
                        video_id: video.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Get a video by id
    pub fn video(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    /// Get a tag by id
    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Get the number of videos
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    /// Check whether the library holds no videos
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
