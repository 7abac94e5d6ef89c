//! Command-line interface for tubemark.
//!
//! Thin consumer of the mutation API: each command opens the store,
//! invokes one operation, and prints the result. Rejections come back as
//! command failures with the store's error message.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::store::{LibraryStore, NewVideo, NoteUpdate, VideoUpdate};

/// tubemark - Personal video bookmarking with timestamped notes and tags
#[derive(Parser, Debug)]
#[command(name = "tubemark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bookmark a video by URL
    Add {
        /// Video URL (youtu.be, watch, embed, and /v/ forms are recognized)
        url: String,

        /// Title (defaults to "New Video")
        #[arg(short, long)]
        title: Option<String>,

        /// Explicit video id, overriding derivation from the URL
        #[arg(long)]
        id: Option<String>,

        /// Length in seconds
        #[arg(short, long)]
        duration: Option<f64>,
    },

    /// List bookmarked videos, newest first
    List {
        /// Maximum number of videos to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a video with its notes and tags
    Show {
        /// Video id
        video_id: String,
    },

    /// Edit a video's fields
    Edit {
        /// Video id
        video_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        thumbnail: Option<String>,

        #[arg(short, long)]
        duration: Option<f64>,

        /// Replace the video's tag references (comma-separated tag ids)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Remove a video and all its notes
    Rm {
        /// Video id
        video_id: String,
    },

    /// Manage notes on a video
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Add a note at a position in the video
    Add {
        /// Video id
        video_id: String,

        /// Position in seconds
        timestamp: f64,

        /// Note text
        content: String,
    },

    /// Edit a note
    Edit {
        /// Video id
        video_id: String,

        /// Note id
        note_id: String,

        /// New position in seconds
        #[arg(long)]
        at: Option<f64>,

        /// New note text
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Remove a note
    Rm {
        /// Video id
        video_id: String,

        /// Note id
        note_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Create a tag
    Add {
        /// Tag name
        name: String,
    },

    /// Rename a tag
    Rename {
        /// Tag id
        id: String,

        /// New name
        name: String,
    },

    /// Delete a tag and strip it from every video
    Rm {
        /// Tag id
        id: String,
    },

    /// List all tags
    List,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Add {
                url,
                title,
                id,
                duration,
            } => add_video(url, title, id, duration),
            Commands::List { limit } => list_videos(limit),
            Commands::Show { video_id } => show_video(&video_id),
            Commands::Edit {
                video_id,
                title,
                url,
                thumbnail,
                duration,
                tags,
            } => edit_video(&video_id, title, url, thumbnail, duration, tags),
            Commands::Rm { video_id } => remove_video(&video_id),
            Commands::Note { command } => execute_note(command),
            Commands::Tag { command } => execute_tag(command),
            Commands::Config => show_config(),
        }
    }
}

fn add_video(
    url: String,
    title: Option<String>,
    id: Option<String>,
    duration: Option<f64>,
) -> Result<()> {
    let mut store = LibraryStore::open()?;

    let added = store.add_video(NewVideo {
        url,
        title,
        id,
        duration,
        thumbnail: None,
    })?;

    println!("Bookmarked: {} ({})", added.video.title, added.video.id);
    if let Some(start) = added.start_at {
        println!("Starts at: {}s", start);
    }

    Ok(())
}

fn list_videos(limit: usize) -> Result<()> {
    let store = LibraryStore::open()?;
    let library = store.library();

    if library.is_empty() {
        println!("Library is empty. Use 'tubemark add <url>' to bookmark a video.");
        return Ok(());
    }

    println!("{:<13} {:<6} {:<50}", "ID", "NOTES", "TITLE");
    println!("{}", "-".repeat(71));

    for video in library.videos.iter().take(limit) {
        println!(
            "{:<13} {:<6} {:<50}",
            video.id,
            video.notes.len(),
            truncate_title(&video.title, 47)
        );
    }

    println!("\nTotal: {} videos", library.len());

    Ok(())
}

/// Shorten a title to at most `max` characters, marking the cut with an
/// ellipsis. Cuts on character boundaries, never mid-codepoint.
fn truncate_title(title: &str, max: usize) -> String {
    match title.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &title[..idx]),
        None => title.to_string(),
    }
}

fn show_video(video_id: &str) -> Result<()> {
    let store = LibraryStore::open()?;
    let Some(video) = store.video(video_id) else {
        anyhow::bail!("video not found: {}", video_id);
    };

    println!("Title: {}", video.title);
    println!("URL: {}", video.url);
    if let Some(duration) = video.duration {
        println!("Duration: {}s", duration);
    }

    if !video.tags.is_empty() {
        let names: Vec<&str> = video
            .tags
            .iter()
            .filter_map(|tag_id| store.library().tag(tag_id))
            .map(|t| t.name.as_str())
            .collect();
        println!("Tags: {}", names.join(", "));
    }

    if !video.notes.is_empty() {
        println!("\nNotes:");
        for note in &video.notes {
            println!("  [{:>8.1}s] {} ({})", note.timestamp, note.content, note.id);
        }
    }

    Ok(())
}

fn edit_video(
    video_id: &str,
    title: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    tags: Option<String>,
) -> Result<()> {
    let mut store = LibraryStore::open()?;

    let tags = tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    store.update_video(
        video_id,
        VideoUpdate {
            url,
            title,
            thumbnail,
            duration,
            tags,
        },
    )?;

    println!("Updated: {}", video_id);
    Ok(())
}

fn remove_video(video_id: &str) -> Result<()> {
    let mut store = LibraryStore::open()?;
    store.delete_video(video_id)?;

    println!("Removed: {}", video_id);
    Ok(())
}

fn execute_note(command: NoteCommands) -> Result<()> {
    let mut store = LibraryStore::open()?;

    match command {
        NoteCommands::Add {
            video_id,
            timestamp,
            content,
        } => {
            let note = store.add_note(&video_id, timestamp, content)?;
            println!("Added note {} at {}s", note.id, note.timestamp);
        }
        NoteCommands::Edit {
            video_id,
            note_id,
            at,
            content,
        } => {
            store.update_note(
                &video_id,
                &note_id,
                NoteUpdate {
                    timestamp: at,
                    content,
                },
            )?;
            println!("Updated note {}", note_id);
        }
        NoteCommands::Rm { video_id, note_id } => {
            store.delete_note(&video_id, &note_id)?;
            println!("Removed note {}", note_id);
        }
    }

    Ok(())
}

fn execute_tag(command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Add { name } => {
            let mut store = LibraryStore::open()?;
            let tag = store.add_tag(name)?;
            println!("Created tag {} ({})", tag.name, tag.id);
        }
        TagCommands::Rename { id, name } => {
            let mut store = LibraryStore::open()?;
            store.update_tag(&id, name)?;
            println!("Renamed tag {}", id);
        }
        TagCommands::Rm { id } => {
            let mut store = LibraryStore::open()?;
            store.delete_tag(&id)?;
            println!("Removed tag {}", id);
        }
        TagCommands::List => {
            let store = LibraryStore::open()?;
            let tags = &store.library().tags;

            if tags.is_empty() {
                println!("No tags yet. Use 'tubemark tag add <name>' to create one.");
                return Ok(());
            }

            println!("{:<38} {:<30}", "ID", "NAME");
            println!("{}", "-".repeat(68));
            for tag in tags {
                println!("{:<38} {:<30}", tag.id, tag.name);
            }
        }
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    println!("Data directory: {}", config.home.display());
    println!("Library file: {}", crate::config::library_file()?.display());
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none found)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title_short_titles_pass_through() {
        assert_eq!(truncate_title("Short", 47), "Short");
        assert_eq!(truncate_title("", 47), "");
    }

    #[test]
    fn test_truncate_title_long_ascii() {
        let long = "a".repeat(60);
        let truncated = truncate_title(&long, 47);
        assert_eq!(truncated, format!("{}...", "a".repeat(47)));
    }

    #[test]
    fn test_truncate_title_multibyte() {
        // 60 two-byte characters: byte length exceeds the cutoff long
        // before the character count does
        let accented = "é".repeat(60);
        assert_eq!(truncate_title(&accented, 47), format!("{}...", "é".repeat(47)));

        let short_but_wide = "é".repeat(24);
        assert_eq!(truncate_title(&short_but_wide, 47), short_but_wide);
    }
}
