use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use reddit_client::RedditClient;
use reposter::{
    CaptionRewriter, Harvester, MediaFetcher, PostStore, Publisher, Schedule, Scheduler,
};
use reposter_common::Config;
use x_client::{XClient, XOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reposter=info".parse()?))
        .init();

    info!("Reddit → X reposter starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    tokio::fs::create_dir_all(&config.media_dir).await?;

    // External clients, built once and shared by the components that need them
    let reddit = Arc::new(RedditClient::new(&config.reddit_user_agent)?);
    let openai = Arc::new(OpenAi::new(&config.openai_api_key, &config.openai_model));
    let x = Arc::new(XClient::new(XOptions {
        access_token: config.x_access_token.clone(),
    }));
    let fetcher = Arc::new(MediaFetcher::new(&config.media_dir));

    let store = PostStore::new(&config.posts_file);
    let harvester = Harvester::new(reddit, fetcher, store.clone(), config.harvest_mode);
    let publisher = Publisher::new(store, CaptionRewriter::new(openai), x);

    let schedule = Schedule::new(
        config.harvest_time,
        Duration::minutes(config.publish_interval_minutes.into()),
        Utc::now(),
    );

    Scheduler::new(
        harvester,
        publisher,
        config.subreddits.clone(),
        config.posts_per_source,
        schedule,
    )
    .run()
    .await?;

    Ok(())
}
