//! Named labels for organizing videos.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named label referenced by id from zero or more videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique tag identifier
    pub id: String,

    /// Display name (must be non-empty)
    pub name: String,
}

impl Tag {
    /// Create a tag with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
