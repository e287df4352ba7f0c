// Test mocks for the reposter pipeline.
//
// One mock per trait boundary:
// - MockContentSource (ContentSource) — source name → candidates, or an error
// - MockDownloader (MediaDownloader) — writes a small file per URL, or fails listed URLs
// - MockCaptionModel (CaptionModel) — fixed reply or failure, records inputs
// - MockPublisher (SocialPublisher) — records uploads and posts, optional failure text
//
// Plus helpers for building candidates and records.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use reposter_common::{Candidate, MediaId, PostReceipt, PostRecord};

use crate::traits::{CaptionModel, ContentSource, MediaDownloader, SocialPublisher};

// ---------------------------------------------------------------------------
// MockContentSource
// ---------------------------------------------------------------------------

/// Unregistered sources return an empty listing; `failing` sources return `Err`.
#[derive(Default)]
pub struct MockContentSource {
    listings: HashMap<String, Vec<Candidate>>,
    failing: HashSet<String>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_source(mut self, source: &str, candidates: Vec<Candidate>) -> Self {
        self.listings.insert(source.to_string(), candidates);
        self
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn hot_posts(&self, source: &str, limit: u32) -> Result<Vec<Candidate>> {
        self.requests
            .lock()
            .unwrap()
            .push((source.to_string(), limit));
        if self.failing.contains(source) {
            bail!("source {source} unavailable");
        }
        Ok(self
            .listings
            .get(source)
            .map(|c| c.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MockDownloader
// ---------------------------------------------------------------------------

/// Writes `<dir>/<id>.<ext>` for every URL except those registered with `fail_url`.
pub struct MockDownloader {
    dir: PathBuf,
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl MockDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            failing: HashSet::new(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_url(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaDownloader for MockDownloader {
    async fn fetch(&self, url: &str, id: &str) -> Option<PathBuf> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return None;
        }
        let path = self
            .dir
            .join(format!("{id}.{}", crate::media::extension_for(url)));
        std::fs::create_dir_all(&self.dir).ok()?;
        std::fs::write(&path, url.as_bytes()).ok()?;
        Some(path)
    }
}

// ---------------------------------------------------------------------------
// MockCaptionModel
// ---------------------------------------------------------------------------

pub struct MockCaptionModel {
    reply: Result<String, String>,
    inputs: Mutex<Vec<String>>,
}

impl MockCaptionModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionModel for MockCaptionModel {
    async fn complete(&self, _instruction: &str, input: &str) -> Result<String> {
        self.inputs.lock().unwrap().push(input.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

// ---------------------------------------------------------------------------
// MockPublisher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub text: String,
    pub media: Vec<MediaId>,
}

/// Records every call. `fail_upload` / `fail_post` make that step return the given text.
#[derive(Default)]
pub struct MockPublisher {
    upload_error: Option<String>,
    post_error: Option<String>,
    uploads: Mutex<Vec<PathBuf>>,
    posts: Mutex<Vec<PublishedPost>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upload(mut self, message: &str) -> Self {
        self.upload_error = Some(message.to_string());
        self
    }

    pub fn fail_post(mut self, message: &str) -> Self {
        self.post_error = Some(message.to_string());
        self
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<PublishedPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialPublisher for MockPublisher {
    async fn upload_media(&self, path: &Path) -> Result<MediaId> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(path.to_path_buf());
        if let Some(message) = &self.upload_error {
            bail!("{message}");
        }
        Ok(MediaId(format!("media-{}", uploads.len())))
    }

    async fn create_post(&self, text: &str, media: &[MediaId]) -> Result<PostReceipt> {
        if let Some(message) = &self.post_error {
            bail!("{message}");
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(PublishedPost {
            text: text.to_string(),
            media: media.to_vec(),
        });
        Ok(PostReceipt {
            id: format!("post-{}", posts.len()),
        })
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// An image link candidate that passes the harvest filter.
pub fn image_candidate(id: &str, source: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: format!("Title of {id}"),
        url: Some(format!("https://i.redd.it/{id}.jpg")),
        is_self: false,
        is_video: false,
        source_name: source.to_string(),
    }
}

/// An unpublished record whose media file is written to `dir`.
pub fn record_with_media(dir: &Path, id: &str) -> PostRecord {
    let path = dir.join(format!("{id}.jpg"));
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(&path, b"jpeg").unwrap();
    PostRecord::new(id, format!("Title of {id}"), format!("https://i.redd.it/{id}.jpg"), "Aww")
        .with_media_path(path)
}
