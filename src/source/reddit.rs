//! Reddit listing source.
//!
//! Fetches `GET {base_url}/r/{subreddit}.json` (the public, unauthenticated
//! front-page listing) and converts each post into a [`FeedItem`].
//!
//! ## For contributors
//!
//! Decoding is split out into [`RedditSource::parse_listing`], a pure
//! function over the response body, so tests can exercise it without the
//! network.  Only the handful of fields the UI shows are deserialized; serde
//! ignores everything else in the (very large) post objects.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{FeedItem, FeedSource, FetchError};
use crate::prefs::Subreddit;

/// Reddit rejects requests with generic user agents, so identify ourselves.
const USER_AGENT: &str = concat!("f5-news/", env!("CARGO_PKG_VERSION"));

/// Client tuning for [`RedditSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Scheme + host, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout, covering connect through body.
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// A subreddit front page fetched over HTTP.
pub struct RedditSource {
    client: reqwest::Client,
    base_url: String,
}

// -- wire format ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: String,
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    author: String,
    #[serde(default)]
    num_comments: u64,
    created_utc: f64,
}

impl RedditSource {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for a subreddit's front page.
    pub fn listing_url(&self, subreddit: &Subreddit) -> String {
        format!("{}/r/{}.json", self.base_url, subreddit.as_str())
    }

    /// Decode a listing body into items, keeping the listing's order.
    ///
    /// Relative permalinks are resolved against `base_url`.  Self posts, which
    /// have no external URL, link to their comments page.
    pub fn parse_listing(body: &[u8], base_url: &str) -> Result<Vec<FeedItem>, FetchError> {
        let listing: Listing = serde_json::from_slice(body)?;
        let base_url = base_url.trim_end_matches('/');

        listing
            .data
            .children
            .into_iter()
            .map(|child| -> Result<FeedItem, FetchError> {
                let post = child.data;

                let created_at = created_at(post.created_utc).ok_or_else(|| {
                    FetchError::InvalidPost {
                        id: post.id.clone(),
                        reason: "created_utc is not a valid timestamp",
                    }
                })?;

                let permalink = if post.permalink.starts_with('/') {
                    format!("{base_url}{}", post.permalink)
                } else {
                    post.permalink
                };

                let link = post
                    .url
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| permalink.clone());

                Ok(FeedItem {
                    id: post.id,
                    title: post.title,
                    link,
                    score: post.score,
                    created_at,
                    author: post.author,
                    num_comments: post.num_comments,
                    permalink,
                })
            })
            .collect()
    }
}

fn created_at(epoch_secs: f64) -> Option<DateTime<Utc>> {
    if !epoch_secs.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp(epoch_secs.trunc() as i64, 0)
}

#[async_trait]
impl FeedSource for RedditSource {
    fn name(&self) -> &str {
        "reddit"
    }

    async fn fetch(&self, subreddit: &Subreddit) -> Result<Vec<FeedItem>, FetchError> {
        let url = self.listing_url(subreddit);
        debug!(%url, "requesting listing");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        Self::parse_listing(&body, &self.base_url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
