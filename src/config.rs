//! Command-line configuration.
//!
//! Every flag has an `F5_NEWS_*` environment fallback.  Flags only seed the
//! initial [`Preferences`]; after launch the key bindings own them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::prefs::{Preferences, RefreshInterval, Subreddit, Theme, ViewMode};
use crate::source::SourceConfig;

#[derive(Debug, Parser)]
#[command(name = "f5-news")]
#[command(about = "Live subreddit front page in your terminal")]
#[command(version)]
pub struct Cli {
    /// Subreddit to open with, e.g. `politics` or `r/politics`
    #[arg(short, long, env = "F5_NEWS_SUBREDDIT", default_value = "all")]
    pub subreddit: Subreddit,

    /// Seconds between refreshes: 30, 60, 120 or 600
    #[arg(short, long, env = "F5_NEWS_INTERVAL", default_value = "60")]
    pub interval: RefreshInterval,

    /// Color theme
    #[arg(short, long, value_enum, env = "F5_NEWS_THEME", default_value_t = Theme::Default)]
    pub theme: Theme,

    /// How posts are laid out
    #[arg(long = "view", value_enum, env = "F5_NEWS_VIEW", default_value_t = ViewMode::List)]
    pub view_mode: ViewMode,

    /// Listing host; point at a local mirror for testing
    #[arg(long, env = "F5_NEWS_BASE_URL", default_value = "https://www.reddit.com")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "F5_NEWS_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Where logs are written (the terminal is taken by the UI)
    #[arg(long, env = "F5_NEWS_LOG_FILE", default_value = "f5-news.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn preferences(&self) -> Preferences {
        Preferences {
            refresh_interval: self.interval,
            subreddit: self.subreddit.clone(),
            theme: self.theme,
            view_mode: self.view_mode,
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
