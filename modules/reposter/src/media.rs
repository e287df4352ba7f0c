use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::traits::MediaDownloader;

/// Extensions kept as-is when naming a downloaded file. Anything else is saved as `jpg`.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "mp4", "gif"];
const DEFAULT_EXTENSION: &str = "jpg";

/// Downloads remote media into a flat directory as `<id>.<ext>`.
pub struct MediaFetcher {
    client: reqwest::Client,
    media_dir: PathBuf,
}

impl MediaFetcher {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            media_dir: media_dir.into(),
        }
    }

    async fn try_fetch(&self, url: &str, id: &str) -> anyhow::Result<Option<PathBuf>> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            warn!(url, %status, "Media download returned non-200");
            return Ok(None);
        }
        let bytes = resp.bytes().await?;

        tokio::fs::create_dir_all(&self.media_dir).await?;
        let path = self
            .media_dir
            .join(format!("{id}.{}", extension_for(url)));
        tokio::fs::write(&path, &bytes).await?;

        debug!(url, path = %path.display(), bytes = bytes.len(), "Media downloaded");
        Ok(Some(path))
    }
}

#[async_trait]
impl MediaDownloader for MediaFetcher {
    async fn fetch(&self, url: &str, id: &str) -> Option<PathBuf> {
        match self.try_fetch(url, id).await {
            Ok(path) => path,
            Err(e) => {
                warn!(url, id, error = %e, "Error downloading media");
                None
            }
        }
    }
}

/// File extension for a media URL: the text after the last `.`, if it is a known media type.
pub fn extension_for(url: &str) -> &'static str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let suffix = without_query
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|ext| **ext == suffix)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}
