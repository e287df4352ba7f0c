use serde::Deserialize;

/// Envelope wrapping every Reddit "thing" (`{"kind": "...", "data": {...}}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Thing<T> {
    #[allow(dead_code)]
    pub kind: String,
    pub data: T,
}

/// Body of a `Listing` thing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Listing {
    pub children: Vec<Thing<RedditPost>>,
    #[allow(dead_code)]
    pub after: Option<String>,
}

/// A single link post (`t3`) from a subreddit listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    /// Link target. For self posts this is the thread permalink.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub is_video: bool,
    pub subreddit: String,
}
