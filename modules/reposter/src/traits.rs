// Trait abstractions for the pipeline's external collaborators.
//
// ContentSource   — hot posts per subreddit (RedditClient).
// MediaDownloader — remote URL to local file (MediaFetcher).
// CaptionModel    — one system instruction plus one input, one completion (OpenAi).
// SocialPublisher — media upload and post creation (XClient).
//
// Clients are built once in main and handed to each component, so tests swap
// in the mocks from `testing` with no network.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use reposter_common::{Candidate, MediaId, PostReceipt};

// ---------------------------------------------------------------------------
// ContentSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Up to `limit` candidates from `source`, in the source's trending order.
    async fn hot_posts(&self, source: &str, limit: u32) -> Result<Vec<Candidate>>;
}

#[async_trait]
impl ContentSource for reddit_client::RedditClient {
    async fn hot_posts(&self, source: &str, limit: u32) -> Result<Vec<Candidate>> {
        let posts = reddit_client::RedditClient::hot_posts(self, source, limit).await?;
        Ok(posts
            .into_iter()
            .map(|p| Candidate {
                id: p.id,
                title: p.title,
                url: p.url,
                is_self: p.is_self,
                is_video: p.is_video,
                source_name: p.subreddit,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MediaDownloader
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download `url` for post `id`. `None` on any failure; failures are logged, never raised.
    async fn fetch(&self, url: &str, id: &str) -> Option<PathBuf>;
}

// ---------------------------------------------------------------------------
// CaptionModel
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn complete(&self, instruction: &str, input: &str) -> Result<String>;
}

#[async_trait]
impl CaptionModel for ai_client::OpenAi {
    async fn complete(&self, instruction: &str, input: &str) -> Result<String> {
        Ok(self.chat_completion(instruction, input).await?)
    }
}

// ---------------------------------------------------------------------------
// SocialPublisher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SocialPublisher: Send + Sync {
    async fn upload_media(&self, path: &Path) -> Result<MediaId>;

    async fn create_post(&self, text: &str, media: &[MediaId]) -> Result<PostReceipt>;
}

#[async_trait]
impl SocialPublisher for x_client::XClient {
    async fn upload_media(&self, path: &Path) -> Result<MediaId> {
        let uploaded = x_client::XClient::upload_media(self, path).await?;
        Ok(MediaId(uploaded.id))
    }

    async fn create_post(&self, text: &str, media: &[MediaId]) -> Result<PostReceipt> {
        let ids: Vec<String> = media.iter().map(|m| m.0.clone()).collect();
        let post = x_client::XClient::create_post(self, text, &ids).await?;
        Ok(PostReceipt { id: post.id })
    }
}
