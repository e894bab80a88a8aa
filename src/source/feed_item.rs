//! The post record shared by every feed source.
//!
//! `FeedItem` is one normalised post from a subreddit listing.  Sources
//! convert their wire format into `FeedItem`s so the poller and the UI stay
//! source-agnostic.
//!
//! ## For contributors
//!
//! Items are immutable once built and the displayed list is replaced
//! wholesale on every successful poll, so there is no ordering or identity
//! logic here: the list keeps whatever order the source returned.

use chrono::{DateTime, Utc};

/// A single post, normalised from the listing response.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedItem {
    /// Source-assigned post id (e.g. `1abc2d`).
    pub id: String,

    /// Post headline.
    pub title: String,

    /// Where the post points: the external URL for link posts, the comments
    /// page for self posts.
    pub link: String,

    /// Net upvotes at fetch time.  Can be negative.
    pub score: i64,

    /// When the post was submitted.
    pub created_at: DateTime<Utc>,

    /// Submitting account, without the `u/` prefix.
    pub author: String,

    pub num_comments: u64,

    /// Absolute URL of the comments page.
    pub permalink: String,
}

impl FeedItem {
    /// Compact age relative to `now`, e.g. `42s`, `7m`, `3h`, `2d`.
    ///
    /// Posts "from the future" (clock skew) read as `now`.
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.created_at).num_seconds();
        match secs {
            s if s <= 0 => "now".to_string(),
            s if s < 60 => format!("{s}s"),
            s if s < 3_600 => format!("{}m", s / 60),
            s if s < 86_400 => format!("{}h", s / 3_600),
            s => format!("{}d", s / 86_400),
        }
    }

    /// Score formatted the way Reddit shows it (`12.3k` above 10 000).
    pub fn score_label(&self) -> String {
        if self.score.abs() >= 10_000 {
            format!("{:.1}k", self.score as f64 / 1_000.0)
        } else {
            self.score.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// Shorthand constructor for tests.
    pub fn make_item(id: &str, score: i64, created_at: DateTime<Utc>) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: format!("Post {id}"),
            link: format!("https://example.com/{id}"),
            score,
            created_at,
            author: "someone".to_string(),
            num_comments: 0,
            permalink: format!("https://www.reddit.com/r/test/comments/{id}/"),
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn age_label_buckets() {
        let item = make_item("a", 1, base());
        assert_eq!(item.age_label(base()), "now");
        assert_eq!(item.age_label(base() + Duration::seconds(42)), "42s");
        assert_eq!(item.age_label(base() + Duration::minutes(7)), "7m");
        assert_eq!(item.age_label(base() + Duration::hours(3)), "3h");
        assert_eq!(item.age_label(base() + Duration::days(2)), "2d");
    }

    #[test]
    fn age_label_clamps_future_posts() {
        let item = make_item("a", 1, base() + Duration::minutes(5));
        assert_eq!(item.age_label(base()), "now");
    }

    #[test]
    fn score_label_abbreviates_large_scores() {
        assert_eq!(make_item("a", 999, base()).score_label(), "999");
        assert_eq!(make_item("b", 12_345, base()).score_label(), "12.3k");
        assert_eq!(make_item("c", -4, base()).score_label(), "-4");
    }
}
