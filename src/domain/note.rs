//! Timestamped annotations attached to a video.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timestamped text annotation owned by exactly one video.
///
/// Notes live inside their parent video's `notes` list and cannot
/// outlive it; `video_id` must always match the enclosing video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note identifier
    pub id: String,

    /// Id of the owning video
    pub video_id: String,

    /// Position in the video, in seconds
    pub timestamp: f64,

    /// Annotation text (must be non-empty)
    pub content: String,

    /// Unix-epoch milliseconds
    pub created_at: i64,

    /// Unix-epoch milliseconds
    pub updated_at: i64,
}

impl Note {
    /// Create a note owned by `video_id`, stamped with the current time
    pub fn new(video_id: impl Into<String>, timestamp: f64, content: impl Into<String>) -> Self {
        let now = Utc::now().timestamp_millis();

        Self {
            id: Uuid::new_v4().to_string(),
            video_id: video_id.into(),
            timestamp,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
