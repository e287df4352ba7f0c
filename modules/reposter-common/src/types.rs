use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A harvested post and its publish state. The only thing persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Identifier assigned by the content source. Unique within the store.
    pub id: String,
    /// Original caption text.
    pub title: String,
    /// Remote media URL.
    pub url: String,
    /// Subreddit the post was harvested from.
    pub source_name: String,
    /// Flips false→true exactly once: on publish, or on retirement.
    #[serde(default)]
    pub published: bool,
    /// Local copy of the media. Kept after publishing even though the file is gone.
    #[serde(default)]
    pub media_path: Option<PathBuf>,
}

impl PostRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            source_name: source_name.into(),
            published: false,
            media_path: None,
        }
    }

    pub fn with_media_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.media_path = Some(path.into());
        self
    }

    /// Mark as published. There is no way back.
    pub fn retire(&mut self) {
        self.published = true;
    }

    /// The media file, if the path is set and the file still exists.
    pub fn existing_media(&self) -> Option<&Path> {
        self.media_path.as_deref().filter(|p| p.is_file())
    }
}

/// A post offered by a content source, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub is_self: bool,
    pub is_video: bool,
    pub source_name: String,
}

/// Opaque handle returned by the publishing service for an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaId(pub String);

/// Confirmation of a created post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostReceipt {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_field_order_with_null_media() {
        let record = PostRecord::new("a", "Title", "https://i.redd.it/a.jpg", "Aww");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"a","title":"Title","url":"https://i.redd.it/a.jpg","source_name":"Aww","published":false,"media_path":null}"#
        );
    }

    #[test]
    fn retire_is_monotonic() {
        let mut record = PostRecord::new("a", "t", "u", "s");
        record.retire();
        record.retire();
        assert!(record.published);
    }

    #[test]
    fn existing_media_requires_file_on_disk() {
        let record = PostRecord::new("a", "t", "u", "s").with_media_path("/nonexistent/a.jpg");
        assert!(record.existing_media().is_none());

        let record = PostRecord::new("a", "t", "u", "s");
        assert!(record.existing_media().is_none());
    }
}
