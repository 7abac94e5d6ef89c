//! Bookmarked videos and their owned notes.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Note;

/// A bookmarked reference to an external video.
///
/// The id is the source platform's own video identifier, not a generated
/// one; this is what makes duplicate-add detection meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Platform video identifier, unique within the library
    pub id: String,

    /// Original watch URL
    pub url: String,

    /// Display title (must be non-empty)
    pub title: String,

    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Length in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Notes in creation order
    #[serde(default)]
    pub notes: Vec<Note>,

    /// Ids of tags applied to this video (references, not copies)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Unix-epoch milliseconds
    pub created_at: i64,

    /// Unix-epoch milliseconds
    pub updated_at: i64,
}

impl Video {
    /// Create a video with no notes or tags, stamped with the current time
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now().timestamp_millis();

        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            thumbnail: None,
            duration: None,
            notes: Vec::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the thumbnail URL
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Set the duration in seconds
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Get a note by id
    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    /// Refresh `updated_at` to the current time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}
