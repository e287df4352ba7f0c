use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use ai_client::truncate_to_char_boundary;
use reposter_common::{Candidate, HarvestMode, PostRecord};

use crate::store::{PostStore, StoreError};
use crate::traits::{ContentSource, MediaDownloader};

/// URL suffixes of media the publisher can attach reliably.
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// Title characters shown in the per-post log line.
const LOG_TITLE_CHARS: usize = 50;

/// Counts from one harvest cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub candidates: usize,
    pub added: usize,
    /// Size of the store after the cycle.
    pub stored: usize,
}

/// Pulls candidates from each source, keeps downloadable images, and writes the store.
pub struct Harvester {
    source: Arc<dyn ContentSource>,
    downloader: Arc<dyn MediaDownloader>,
    store: PostStore,
    mode: HarvestMode,
}

impl Harvester {
    pub fn new(
        source: Arc<dyn ContentSource>,
        downloader: Arc<dyn MediaDownloader>,
        store: PostStore,
        mode: HarvestMode,
    ) -> Self {
        Self {
            source,
            downloader,
            store,
            mode,
        }
    }

    /// Run one harvest cycle over `sources`. Only store errors escape.
    pub async fn harvest(
        &self,
        sources: &[String],
        per_source_limit: u32,
    ) -> Result<HarvestReport, StoreError> {
        let mut records = match self.mode {
            HarvestMode::Overwrite => Vec::new(),
            HarvestMode::Merge => self.store.load().await?,
        };
        let mut seen: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
        let mut report = HarvestReport::default();

        for source_name in sources {
            let candidates = match self.source.hot_posts(source_name, per_source_limit).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(source = source_name.as_str(), error = %e, "Error fetching posts from source");
                    report.sources_failed += 1;
                    continue;
                }
            };
            report.sources_ok += 1;
            report.candidates += candidates.len();

            for candidate in candidates {
                let Some(url) = publishable_image_url(&candidate) else {
                    continue;
                };
                if seen.contains(&candidate.id) {
                    continue;
                }
                let Some(media_path) = self.downloader.fetch(url, &candidate.id).await else {
                    continue;
                };

                info!(
                    source = source_name.as_str(),
                    title = truncate_to_char_boundary(&candidate.title, LOG_TITLE_CHARS),
                    "Added post"
                );
                seen.insert(candidate.id.clone());
                records.push(
                    PostRecord::new(
                        candidate.id.as_str(),
                        candidate.title.as_str(),
                        url,
                        candidate.source_name.as_str(),
                    )
                    .with_media_path(media_path),
                );
                report.added += 1;
            }

            info!(source = source_name.as_str(), total = report.added, "Source harvested");
        }

        self.store.save(&records).await?;
        report.stored = records.len();

        info!(
            added = report.added,
            stored = report.stored,
            sources_ok = report.sources_ok,
            sources_failed = report.sources_failed,
            "Fetched new posts"
        );
        Ok(report)
    }
}

/// The candidate's URL if it is a link (not self, not native video) to a static image or GIF.
pub fn publishable_image_url(candidate: &Candidate) -> Option<&str> {
    if candidate.is_self || candidate.is_video {
        return None;
    }
    let url = candidate.url.as_deref()?;
    let lower = url.to_ascii_lowercase();
    IMAGE_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
        .then_some(url)
}
