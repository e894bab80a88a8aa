//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait, the common [`FeedItem`]
//! type and the [`FetchError`] every source reports.  Concrete sources live
//! in sub-modules (currently only [`reddit`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lemmy.rs`).
//! 2. Define a struct and implement [`FeedSource`] for it.
//! 3. Add `mod lemmy;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of [`RedditSource`].
//!
//! The poller and the UI never look past the trait.

mod error;
mod feed_item;
mod reddit;

pub use error::FetchError;
pub use feed_item::FeedItem;
pub use reddit::{RedditSource, SourceConfig};

use async_trait::async_trait;

use crate::prefs::Subreddit;

/// Trait that every feed source must implement.
///
/// The poller calls [`fetch()`](FeedSource::fetch) from a spawned tokio
/// task, so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Fetch the current front page of `subreddit`, in source order.
    async fn fetch(&self, subreddit: &Subreddit) -> Result<Vec<FeedItem>, FetchError>;
}
