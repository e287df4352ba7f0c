pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::RedditPost;

use types::{Listing, Thing};

const BASE_URL: &str = "https://www.reddit.com";

/// Reddit caps listing pages at 100 items.
const MAX_LISTING_LIMIT: u32 = 100;

pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch up to `limit` posts from a subreddit's "hot" listing, in Reddit's order.
    pub async fn hot_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<RedditPost>> {
        let name = normalize_subreddit(subreddit)?;
        let limit = limit.min(MAX_LISTING_LIMIT);

        tracing::debug!(subreddit = name, limit, "Fetching hot listing");

        let url = format!("{}/r/{}/hot.json", self.base_url, name);
        let resp = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let listing: Thing<Listing> = serde_json::from_str(&body)?;

        let posts: Vec<RedditPost> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .take(limit as usize)
            .collect();
        tracing::debug!(subreddit = name, count = posts.len(), "Fetched hot listing");

        Ok(posts)
    }
}

/// Accepts "Aww", "r/Aww" or "/r/Aww/" and returns the bare name.
fn normalize_subreddit(raw: &str) -> Result<&str> {
    let name = raw
        .trim()
        .trim_matches('/')
        .trim_start_matches("r/");
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(RedditError::InvalidSubreddit(raw.to_string()))
    }
}
