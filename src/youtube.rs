//! YouTube URL parsing.
//!
//! Extracts the 11-character video id (and an optional start position) from
//! the URL forms YouTube hands out: short links, watch pages, embed paths,
//! and the legacy `/v/` path. The video id doubles as the bookmark's primary
//! key, so extraction has to be strict about the id itself while staying
//! tolerant of junk around it.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// What a recognized YouTube URL resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    /// The 11-character video id
    pub video_id: String,

    /// Start position from a `t`/`start` parameter, in seconds
    pub start_at: Option<u64>,
}

/// Video ids are always exactly this long
const VIDEO_ID_LEN: usize = 11;

/// Thumbnail URL for a video id (medium-quality variant)
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

/// Parse any recognized YouTube URL form into a [`VideoRef`].
///
/// Returns `None` when no 11-character video id can be extracted.
pub fn parse_url(raw: &str) -> Option<VideoRef> {
    let Ok(url) = Url::parse(raw) else {
        // Inputs the URL parser refuses (e.g. no scheme) get one more
        // chance through a loose pattern match, id only.
        return fallback_parse(raw);
    };

    let host = url.host_str()?;
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    let (video_id, start_at) = if host == "youtu.be" {
        let id = url.path().trim_start_matches('/').to_string();
        let start = query("t").and_then(|t| parse_start(&t));
        (id, start)
    } else if host.ends_with("youtube.com") {
        let path = url.path();
        if path == "/watch" {
            let id = query("v")?;
            let start = query("t").and_then(|t| parse_start(&t));
            (id, start)
        } else if let Some(rest) = path.strip_prefix("/embed/") {
            // Embed URLs carry a plain-seconds `start` parameter
            let id = rest.split('/').next().unwrap_or_default().to_string();
            let start = query("start").and_then(|s| s.parse().ok());
            (id, start)
        } else if let Some(rest) = path.strip_prefix("/v/") {
            let id = rest.split('/').next().unwrap_or_default().to_string();
            let start = query("t").and_then(|t| parse_start(&t));
            (id, start)
        } else {
            return None;
        }
    } else {
        return None;
    };

    // A stray query or fragment glued onto the id is trimmed, not fatal
    let mut id = video_id;
    if let Some(pos) = id.find(['&', '?']) {
        id.truncate(pos);
    }

    (id.len() == VIDEO_ID_LEN).then_some(VideoRef {
        video_id: id,
        start_at,
    })
}

/// Last-resort id extraction for strings `Url::parse` rejects
fn fallback_parse(raw: &str) -> Option<VideoRef> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?:youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*)")
            .expect("fallback pattern is valid")
    });

    let id = pattern.captures(raw)?.get(1)?.as_str();
    (id.len() == VIDEO_ID_LEN).then(|| VideoRef {
        video_id: id.to_string(),
        start_at: None,
    })
}

/// Parse a `t` parameter: either plain seconds or a compound `XhYmZs` form
fn parse_start(t: &str) -> Option<u64> {
    if !t.contains(['h', 'm', 's']) {
        return t.parse().ok();
    }

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(\d+)([hms])").expect("duration pattern is valid"));

    let mut total = 0u64;
    let mut matched = false;
    for caps in pattern.captures_iter(t) {
        let value: u64 = caps[1].parse().ok()?;
        let seconds = match &caps[2] {
            "h" => value.checked_mul(3600)?,
            "m" => value.checked_mul(60)?,
            _ => value,
        };
        total = total.checked_add(seconds)?;
        matched = true;
    }

    matched.then_some(total)
}
