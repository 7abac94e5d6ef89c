//! Library mutation API.
//!
//! The one sanctioned way to change the library. Every operation reads the
//! current aggregate, computes a candidate next state, validates it, and
//! only then replaces the in-memory library and persists it through
//! [`Storage`]; a rejected candidate leaves both untouched. Memory and the
//! storage slot therefore agree immediately after every successful
//! mutation.
//!
//! Operations return an explicit [`StoreError`] instead of silently
//! no-opping, so callers can tell "succeeded" from "rejected" without
//! diffing state. Rejections are also logged.

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::domain::{Library, Note, Tag, ValidationError, Video};
use crate::storage::Storage;
use crate::youtube;

/// Title given to a video added without one
const DEFAULT_TITLE: &str = "New Video";

/// Why a mutation was rejected (state is unchanged in every case)
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad input: no video id could be derived from the URL. The one
    /// rejection callers are expected to show to the user.
    #[error("could not derive a video id from url: {url}")]
    InvalidUrl { url: String },

    #[error("video already bookmarked: {id}")]
    DuplicateVideo { id: String },

    #[error("tag already exists: {name}")]
    DuplicateTag { name: String },

    #[error("video not found: {id}")]
    VideoNotFound { id: String },

    #[error("note {note_id} not found on video {video_id}")]
    NoteNotFound { video_id: String, note_id: String },

    #[error("tag not found: {id}")]
    TagNotFound { id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Input for [`LibraryStore::add_video`]
#[derive(Debug, Clone, Default)]
pub struct NewVideo {
    /// Watch URL; the video id is derived from it unless `id` is set
    pub url: String,

    /// Title (defaults to "New Video")
    pub title: Option<String>,

    /// Explicit video id, overriding derivation from the URL
    pub id: Option<String>,

    /// Length in seconds (defaults to 0)
    pub duration: Option<f64>,

    /// Thumbnail URL (defaults to the platform's mqdefault image)
    pub thumbnail: Option<String>,
}

impl NewVideo {
    /// Input with only a URL; everything else defaulted
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// What a successful [`LibraryStore::add_video`] produced
#[derive(Debug, Clone)]
pub struct AddedVideo {
    /// The video exactly as stored
    pub video: Video,

    /// Start position carried by the URL, in seconds, when it had one
    pub start_at: Option<u64>,
}

/// Partial update for [`LibraryStore::update_video`]; `None` fields are
/// left alone
#[derive(Debug, Clone, Default)]
pub struct VideoUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,

    /// Replacement set of tag-id references
    pub tags: Option<Vec<String>>,
}

/// Partial update for [`LibraryStore::update_note`]
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
    pub timestamp: Option<f64>,
    pub content: Option<String>,
}

/// Single-writer owner of the in-memory library and its storage.
///
/// UI layers hold one of these and never touch the library directly;
/// that is what keeps the read-validate-commit discipline airtight.
pub struct LibraryStore {
    library: Library,
    storage: Storage,
}

impl LibraryStore {
    /// Open the store over the default on-disk slot
    pub fn open() -> Result<Self> {
        Ok(Self::with_storage(Storage::open_default()?))
    }

    /// Build a store over any storage, loading whatever it holds
    pub fn with_storage(storage: Storage) -> Self {
        let library = storage.load();
        Self { library, storage }
    }

    /// The current library state
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Get a video by id (pure read)
    pub fn video(&self, id: &str) -> Option<&Video> {
        self.library.video(id)
    }

    /// Bookmark a video.
    ///
    /// The id is derived from the URL unless supplied; an underivable id is
    /// an [`StoreError::InvalidUrl`], an already-bookmarked id a
    /// [`StoreError::DuplicateVideo`]. The new video goes to the front of
    /// the list (newest first). The returned [`AddedVideo`] carries any
    /// start position found in the URL so callers can jump straight to it.
    pub fn add_video(&mut self, input: NewVideo) -> Result<AddedVideo, StoreError> {
        let parsed = youtube::parse_url(&input.url);
        let id = match input
            .id
            .or_else(|| parsed.as_ref().map(|p| p.video_id.clone()))
        {
            Some(id) => id,
            None => {
                warn!("No video id could be derived from {}", input.url);
                return Err(StoreError::InvalidUrl { url: input.url });
            }
        };

        if self.library.video(&id).is_some() {
            warn!("Video already bookmarked: {}", id);
            return Err(StoreError::DuplicateVideo { id });
        }

        let title = input.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let thumbnail = input
            .thumbnail
            .unwrap_or_else(|| youtube::thumbnail_url(&id));
        let video = Video::new(id, input.url, title)
            .with_thumbnail(thumbnail)
            .with_duration(input.duration.unwrap_or(0.0));

        let mut candidate = self.library.clone();
        candidate.videos.insert(0, video.clone());
        self.commit(candidate)?;

        Ok(AddedVideo {
            video,
            start_at: parsed.and_then(|p| p.start_at),
        })
    }

    /// Merge a partial update into a video and stamp `updated_at`
    pub fn update_video(&mut self, id: &str, updates: VideoUpdate) -> Result<(), StoreError> {
        let mut candidate = self.library.clone();
        let Some(video) = candidate.videos.iter_mut().find(|v| v.id == id) else {
            warn!("Video not found: {}", id);
            return Err(StoreError::VideoNotFound { id: id.to_string() });
        };

        if let Some(url) = updates.url {
            video.url = url;
        }
        if let Some(title) = updates.title {
            video.title = title;
        }
        if let Some(thumbnail) = updates.thumbnail {
            video.thumbnail = Some(thumbnail);
        }
        if let Some(duration) = updates.duration {
            video.duration = Some(duration);
        }
        if let Some(tags) = updates.tags {
            video.tags = tags;
        }
        video.touch();

        self.commit(candidate)
    }

    /// Remove a video and, with it, all of its notes
    pub fn delete_video(&mut self, id: &str) -> Result<(), StoreError> {
        if self.library.video(id).is_none() {
            warn!("Video not found: {}", id);
            return Err(StoreError::VideoNotFound { id: id.to_string() });
        }

        let mut candidate = self.library.clone();
        candidate.videos.retain(|v| v.id != id);
        self.commit(candidate)
    }

    /// Append a note to a video's note list and stamp the video
    pub fn add_note(
        &mut self,
        video_id: &str,
        timestamp: f64,
        content: impl Into<String>,
    ) -> Result<Note, StoreError> {
        let mut candidate = self.library.clone();
        let Some(video) = candidate.videos.iter_mut().find(|v| v.id == video_id) else {
            warn!("Cannot add note, video not found: {}", video_id);
            return Err(StoreError::VideoNotFound {
                id: video_id.to_string(),
            });
        };

        let note = Note::new(video_id, timestamp, content);
        video.notes.push(note.clone());
        video.touch();

        self.commit(candidate)?;
        Ok(note)
    }

    /// Merge a partial update into a note, stamping both the note and its
    /// parent video
    pub fn update_note(
        &mut self,
        video_id: &str,
        note_id: &str,
        updates: NoteUpdate,
    ) -> Result<(), StoreError> {
        let mut candidate = self.library.clone();
        let Some(video) = candidate.videos.iter_mut().find(|v| v.id == video_id) else {
            warn!("Video not found: {}", video_id);
            return Err(StoreError::VideoNotFound {
                id: video_id.to_string(),
            });
        };
        let Some(note) = video.notes.iter_mut().find(|n| n.id == note_id) else {
            warn!("Note {} not found on video {}", note_id, video_id);
            return Err(StoreError::NoteNotFound {
                video_id: video_id.to_string(),
                note_id: note_id.to_string(),
            });
        };

        if let Some(timestamp) = updates.timestamp {
            note.timestamp = timestamp;
        }
        if let Some(content) = updates.content {
            note.content = content;
        }
        note.updated_at = Utc::now().timestamp_millis();
        video.touch();

        self.commit(candidate)
    }

    /// Remove a note from its video and stamp the video
    pub fn delete_note(&mut self, video_id: &str, note_id: &str) -> Result<(), StoreError> {
        let mut candidate = self.library.clone();
        let Some(video) = candidate.videos.iter_mut().find(|v| v.id == video_id) else {
            warn!("Video not found: {}", video_id);
            return Err(StoreError::VideoNotFound {
                id: video_id.to_string(),
            });
        };
        if video.note(note_id).is_none() {
            warn!("Note {} not found on video {}", note_id, video_id);
            return Err(StoreError::NoteNotFound {
                video_id: video_id.to_string(),
                note_id: note_id.to_string(),
            });
        }

        video.notes.retain(|n| n.id != note_id);
        video.touch();

        self.commit(candidate)
    }

    /// Create a tag; an existing tag with the exact same name (case
    /// sensitive) is a [`StoreError::DuplicateTag`]
    pub fn add_tag(&mut self, name: impl Into<String>) -> Result<Tag, StoreError> {
        let name = name.into();
        if self.library.tags.iter().any(|t| t.name == name) {
            warn!("Tag already exists: {}", name);
            return Err(StoreError::DuplicateTag { name });
        }

        let tag = Tag::new(name);
        let mut candidate = self.library.clone();
        candidate.tags.push(tag.clone());

        self.commit(candidate)?;
        Ok(tag)
    }

    /// Rename a tag in place. No uniqueness check on the new name; two
    /// tags may end up sharing one after a rename.
    pub fn update_tag(&mut self, id: &str, name: impl Into<String>) -> Result<(), StoreError> {
        let mut candidate = self.library.clone();
        let Some(tag) = candidate.tags.iter_mut().find(|t| t.id == id) else {
            warn!("Tag not found: {}", id);
            return Err(StoreError::TagNotFound { id: id.to_string() });
        };

        tag.name = name.into();
        self.commit(candidate)
    }

    /// Remove a tag and strip its id from every video's tag references,
    /// in the same commit. This cascade is what keeps references from
    /// dangling, so tag removal must always go through here.
    pub fn delete_tag(&mut self, id: &str) -> Result<(), StoreError> {
        if self.library.tag(id).is_none() {
            warn!("Tag not found: {}", id);
            return Err(StoreError::TagNotFound { id: id.to_string() });
        }

        let mut candidate = self.library.clone();
        candidate.tags.retain(|t| t.id != id);
        for video in &mut candidate.videos {
            video.tags.retain(|tag_id| tag_id != id);
        }

        self.commit(candidate)
    }

    /// Validate a candidate and, on success, make it the current state and
    /// persist it. The single choke point every mutation goes through.
    fn commit(&mut self, candidate: Library) -> Result<(), StoreError> {
        if let Err(e) = candidate.validate() {
            warn!("Rejecting mutation, candidate failed validation: {}", e);
            return Err(e.into());
        }

        self.storage.save(&candidate);
        self.library = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LibraryStore {
        LibraryStore::with_storage(Storage::in_memory())
    }

    #[test]
    fn test_add_video_derives_id_and_defaults() {
        let mut store = store();
        let added = store
            .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ?t=1m30s"))
            .unwrap();

        assert_eq!(added.video.id, "dQw4w9WgXcQ");
        assert_eq!(added.start_at, Some(90));
        assert_eq!(added.video.title, "New Video");
        assert_eq!(
            added.video.thumbnail.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg")
        );
        assert_eq!(added.video.duration, Some(0.0));
    }

    #[test]
    fn test_add_video_prepends() {
        let mut store = store();
        store
            .add_video(NewVideo::from_url("https://youtu.be/aaaaaaaaaaa"))
            .unwrap();
        store
            .add_video(NewVideo::from_url("https://youtu.be/bbbbbbbbbbb"))
            .unwrap();

        let ids: Vec<_> = store.library().videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["bbbbbbbbbbb", "aaaaaaaaaaa"]);
    }

    #[test]
    fn test_add_video_rejects_unparseable_url() {
        let mut store = store();
        let result = store.add_video(NewVideo::from_url("https://example.com/nope"));

        assert!(matches!(result, Err(StoreError::InvalidUrl { .. })));
        assert!(store.library().is_empty());
    }

    #[test]
    fn test_explicit_id_overrides_derivation() {
        let mut store = store();
        let mut input = NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ");
        input.id = Some("custom-id-00".to_string());

        let added = store.add_video(input).unwrap();
        assert_eq!(added.video.id, "custom-id-00");
    }

    #[test]
    fn test_update_tag_skips_uniqueness_check() {
        let mut store = store();
        let first = store.add_tag("rust").unwrap();
        store.add_tag("science").unwrap();

        // Renaming onto an existing name is allowed
        store.update_tag(&first.id, "science").unwrap();
        let science_count = store
            .library()
            .tags
            .iter()
            .filter(|t| t.name == "science")
            .count();
        assert_eq!(science_count, 2);
    }

    #[test]
    fn test_update_tag_to_empty_name_rejected() {
        let mut store = store();
        let tag = store.add_tag("rust").unwrap();

        let result = store.update_tag(&tag.id, "");
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.library().tags[0].name, "rust");
    }
}
