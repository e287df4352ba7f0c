use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use reposter_common::PostReceipt;
use x_client::XError;

use crate::rewriter::CaptionRewriter;
use crate::store::{PostStore, StoreError};
use crate::traits::SocialPublisher;

/// What a single `publish_one` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Every stored record is already published.
    NothingToPublish,
    Published { id: String, post_id: String },
    /// The record's media file was gone; retired without posting.
    RetiredMissingMedia { id: String },
    /// The service rejected the media; retired so it is not retried.
    RetiredMediaRejected { id: String },
    /// Publishing failed for another reason; the record stays queued.
    Failed { id: String },
}

/// Publishes the oldest unpublished record, one per call.
pub struct Publisher {
    store: PostStore,
    rewriter: CaptionRewriter,
    social: Arc<dyn SocialPublisher>,
}

impl Publisher {
    pub fn new(store: PostStore, rewriter: CaptionRewriter, social: Arc<dyn SocialPublisher>) -> Self {
        Self {
            store,
            rewriter,
            social,
        }
    }

    /// Only store errors escape; every publishing failure is handled here.
    pub async fn publish_one(&self) -> Result<PublishOutcome, StoreError> {
        let mut records = self.store.load().await?;

        let Some(idx) = records.iter().position(|r| !r.published) else {
            info!("No unpublished posts available");
            return Ok(PublishOutcome::NothingToPublish);
        };
        let id = records[idx].id.clone();

        let Some(media) = records[idx].existing_media().map(Path::to_path_buf) else {
            warn!(
                id = id.as_str(),
                media_path = ?records[idx].media_path,
                "Media file not found, retiring post"
            );
            records[idx].retire();
            self.store.save(&records).await?;
            return Ok(PublishOutcome::RetiredMissingMedia { id });
        };

        let caption = self.rewriter.rewrite(&records[idx].title).await;

        match self.post(&media, &caption).await {
            Ok(receipt) => {
                records[idx].retire();
                self.store.save(&records).await?;
                info!(id = id.as_str(), post_id = receipt.id.as_str(), caption = caption.as_str(), "Posted");

                match tokio::fs::remove_file(&media).await {
                    Ok(()) => info!(path = %media.display(), "Cleaned up media file"),
                    Err(e) => warn!(path = %media.display(), error = %e, "Error cleaning up media file"),
                }
                Ok(PublishOutcome::Published {
                    id,
                    post_id: receipt.id,
                })
            }
            Err(e) => {
                warn!(id = id.as_str(), error = %e, "Error publishing post");
                if is_media_related(&e) {
                    warn!(id = id.as_str(), "Media rejected, retiring post");
                    records[idx].retire();
                    self.store.save(&records).await?;
                    Ok(PublishOutcome::RetiredMediaRejected { id })
                } else {
                    Ok(PublishOutcome::Failed { id })
                }
            }
        }
    }

    async fn post(&self, media: &Path, caption: &str) -> anyhow::Result<PostReceipt> {
        let media_id = self.social.upload_media(media).await?;
        self.social.create_post(caption, &[media_id]).await
    }
}

/// Whether the service rejected the attached media. Transport and decode
/// failures never count, whatever their text says.
pub fn is_media_related(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<XError>() {
        Some(XError::Network(_) | XError::Parse(_)) => false,
        Some(XError::MediaFile(_)) => true,
        Some(XError::Api { .. }) | None => format!("{error:#}").to_lowercase().contains("media"),
    }
}
