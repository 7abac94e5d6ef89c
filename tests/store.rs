//! Mutation API integration tests.
//!
//! Exercises the read-validate-commit protocol end to end over an
//! in-memory slot: rejected mutations must leave both the in-memory
//! library and the persisted copy untouched, successful ones must keep
//! the two identical.

use tubemark::{LibraryStore, NewVideo, Storage, StoreError, VideoUpdate};

fn store() -> LibraryStore {
    LibraryStore::with_storage(Storage::in_memory())
}

#[test]
fn test_add_video_scenario() {
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

    let stored = store.video("dQw4w9WgXcQ").unwrap();
    assert_eq!(stored, &added.video);
}

#[test]
fn test_adding_same_url_twice_is_rejected() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    let before = store.library().clone();
    let result = store.add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"));

    assert!(matches!(result, Err(StoreError::DuplicateVideo { .. })));
    assert_eq!(store.library(), &before);
    assert_eq!(store.library().len(), 1);
}

#[test]
fn test_no_two_videos_ever_share_an_id() {
    let mut store = store();

    // Same id arrives through different URL forms
    let urls = [
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
    ];
    for url in urls {
        let _ = store.add_video(NewVideo::from_url(url));
    }

    let ids: Vec<&str> = store.library().videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["dQw4w9WgXcQ"]);
}

#[test]
fn test_duplicate_tag_name_is_rejected() {
    let mut store = store();
    store.add_tag("Science").unwrap();

    let result = store.add_tag("Science");
    assert!(matches!(result, Err(StoreError::DuplicateTag { .. })));

    let science_count = store
        .library()
        .tags
        .iter()
        .filter(|t| t.name == "Science")
        .count();
    assert_eq!(science_count, 1);
}

#[test]
fn test_tag_names_are_case_sensitive() {
    let mut store = store();
    store.add_tag("Science").unwrap();

    // Different case is a different tag
    store.add_tag("science").unwrap();
    assert_eq!(store.library().tags.len(), 2);
}

#[test]
fn test_add_note_to_missing_video_changes_nothing() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    let before = store.library().clone();
    let result = store.add_note("missingVideoId", 10.0, "x");

    assert!(matches!(result, Err(StoreError::VideoNotFound { .. })));
    assert_eq!(store.library(), &before);

    let total_notes: usize = store.library().videos.iter().map(|v| v.notes.len()).sum();
    assert_eq!(total_notes, 0);
}

#[test]
fn test_note_lifecycle_stamps_parent_video() {
    let mut store = store();
    let added = store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    let note = store.add_note("dQw4w9WgXcQ", 42.0, "great part").unwrap();
    let video = store.video("dQw4w9WgXcQ").unwrap();
    assert_eq!(video.notes.len(), 1);
    assert_eq!(video.notes[0].video_id, "dQw4w9WgXcQ");
    assert!(video.updated_at >= added.video.updated_at);

    store
        .update_note(
            "dQw4w9WgXcQ",
            &note.id,
            tubemark::NoteUpdate {
                timestamp: Some(50.0),
                content: None,
            },
        )
        .unwrap();
    let updated = store.video("dQw4w9WgXcQ").unwrap().note(&note.id).unwrap();
    assert_eq!(updated.timestamp, 50.0);
    assert_eq!(updated.content, "great part");

    store.delete_note("dQw4w9WgXcQ", &note.id).unwrap();
    assert!(store.video("dQw4w9WgXcQ").unwrap().notes.is_empty());
}

#[test]
fn test_empty_note_content_is_rejected() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    let result = store.add_note("dQw4w9WgXcQ", 10.0, "");
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert!(store.video("dQw4w9WgXcQ").unwrap().notes.is_empty());
}

#[test]
fn test_update_video_to_empty_title_is_rejected() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ").with_title("Keeper"))
        .unwrap();

    let result = store.update_video(
        "dQw4w9WgXcQ",
        VideoUpdate {
            title: Some(String::new()),
            ..VideoUpdate::default()
        },
    );

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(store.video("dQw4w9WgXcQ").unwrap().title, "Keeper");
}

#[test]
fn test_update_video_merges_partial_fields() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    store
        .update_video(
            "dQw4w9WgXcQ",
            VideoUpdate {
                title: Some("Renamed".to_string()),
                duration: Some(212.0),
                ..VideoUpdate::default()
            },
        )
        .unwrap();

    let video = store.video("dQw4w9WgXcQ").unwrap();
    assert_eq!(video.title, "Renamed");
    assert_eq!(video.duration, Some(212.0));
    // Untouched fields survive the merge
    assert_eq!(video.url, "https://youtu.be/dQw4w9WgXcQ");
}

#[test]
fn test_delete_video_takes_its_notes_with_it() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();
    store.add_note("dQw4w9WgXcQ", 1.0, "a").unwrap();
    store.add_note("dQw4w9WgXcQ", 2.0, "b").unwrap();

    store.delete_video("dQw4w9WgXcQ").unwrap();
    assert!(store.library().is_empty());
}

#[test]
fn test_delete_tag_cascades_in_one_commit() {
    let mut store = store();
    store
        .add_video(NewVideo::from_url("https://youtu.be/aaaaaaaaaaa"))
        .unwrap();
    store
        .add_video(NewVideo::from_url("https://youtu.be/bbbbbbbbbbb"))
        .unwrap();

    let science = store.add_tag("Science").unwrap();
    let music = store.add_tag("Music").unwrap();

    // Reference the tags from both videos
    for id in ["aaaaaaaaaaa", "bbbbbbbbbbb"] {
        store
            .update_video(
                id,
                VideoUpdate {
                    tags: Some(vec![science.id.clone(), music.id.clone()]),
                    ..VideoUpdate::default()
                },
            )
            .unwrap();
    }

    store.delete_tag(&science.id).unwrap();

    assert!(store.library().tag(&science.id).is_none());
    for video in &store.library().videos {
        assert!(!video.tags.contains(&science.id), "dangling tag reference");
        assert!(video.tags.contains(&music.id));
    }
}
