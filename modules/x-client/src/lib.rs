pub mod error;
pub mod types;

pub use error::{Result, XError};
pub use types::{CreatedPost, UploadedMedia};

use std::path::Path;

use reqwest::multipart::{Form, Part};
use types::{ApiResponse, CreatePostRequest, PostMedia};

const BASE_URL: &str = "https://api.x.com/2";

#[derive(Debug, Clone)]
pub struct XOptions {
    /// OAuth 2.0 user-context access token with `tweet.write` and `media.write` scopes.
    pub access_token: String,
}

pub struct XClient {
    client: reqwest::Client,
    options: XOptions,
    base_url: String,
}

impl XClient {
    pub fn new(options: XOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Upload a local image or GIF in one request. Returns the media id to attach to a post.
    pub async fn upload_media(&self, path: &Path) -> Result<UploadedMedia> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| XError::MediaFile(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media")
            .to_string();
        let (mime, category) = media_kind(path);

        tracing::info!(file = %file_name, bytes = bytes.len(), mime, "Uploading media");

        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
        let form = Form::new()
            .part("media", part)
            .text("media_category", category);

        let url = format!("{}/media/upload", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.access_token)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let api_resp: ApiResponse<UploadedMedia> = serde_json::from_str(&body)?;
        tracing::debug!(media_id = %api_resp.data.id, "Media uploaded");
        Ok(api_resp.data)
    }

    /// Create a post with text and any number of previously uploaded media ids.
    pub async fn create_post(&self, text: &str, media_ids: &[String]) -> Result<CreatedPost> {
        let request = CreatePostRequest {
            text,
            media: (!media_ids.is_empty()).then_some(PostMedia { media_ids }),
        };

        let url = format!("{}/tweets", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.access_token)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let api_resp: ApiResponse<CreatedPost> = serde_json::from_str(&body)?;
        tracing::info!(post_id = %api_resp.data.id, "Post created");
        Ok(api_resp.data)
    }
}

/// MIME type and upload category for a file, by extension.
fn media_kind(path: &Path) -> (&'static str, &'static str) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => ("image/png", "tweet_image"),
        Some("gif") => ("image/gif", "tweet_gif"),
        Some("mp4") => ("video/mp4", "tweet_video"),
        _ => ("image/jpeg", "tweet_image"),
    }
}
