//! User preferences and the store that owns them.
//!
//! [`PreferenceStore`] is owned by the [`App`](crate::app::App).  Everything
//! else (the poller in particular) only ever sees a read-only
//! [`watch::Receiver`] obtained from [`PreferenceStore::subscribe`], so there
//! is exactly one writer.
//!
//! ## For contributors
//!
//! The field types carry the invariants: a [`RefreshInterval`] can only be
//! one of the menu values and a [`Subreddit`] can never be empty.  Setters
//! therefore never fail.  To add a new menu entry, extend the relevant
//! `ALL`/`CHOICES` constant and the key bindings in [`crate::input`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

/// Errors raised when building a preference value from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("subreddit name must not be empty")]
    EmptySubreddit,

    #[error("invalid subreddit name {0:?}: only letters, digits and '_' are allowed")]
    InvalidSubreddit(String),

    #[error("unsupported refresh interval {0:?}: expected one of 30, 60, 120, 600")]
    UnsupportedInterval(String),
}

// ---------------------------------------------------------------------------
// Refresh interval
// ---------------------------------------------------------------------------

/// How often the front page is re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshInterval {
    Secs30,
    #[default]
    Secs60,
    Secs120,
    Secs600,
}

impl RefreshInterval {
    /// Menu order.
    pub const ALL: [RefreshInterval; 4] = [
        RefreshInterval::Secs30,
        RefreshInterval::Secs60,
        RefreshInterval::Secs120,
        RefreshInterval::Secs600,
    ];

    pub fn as_secs(self) -> u64 {
        match self {
            RefreshInterval::Secs30 => 30,
            RefreshInterval::Secs60 => 60,
            RefreshInterval::Secs120 => 120,
            RefreshInterval::Secs600 => 600,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }

    /// Short human label shown in the navbar menu.
    pub fn label(self) -> &'static str {
        match self {
            RefreshInterval::Secs30 => "30s",
            RefreshInterval::Secs60 => "1m",
            RefreshInterval::Secs120 => "2m",
            RefreshInterval::Secs600 => "10m",
        }
    }

    /// The next menu entry, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl TryFrom<u64> for RefreshInterval {
    type Error = PreferenceError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_secs() == secs)
            .ok_or_else(|| PreferenceError::UnsupportedInterval(secs.to_string()))
    }
}

impl FromStr for RefreshInterval {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .strip_suffix('s')
            .unwrap_or(trimmed)
            .parse::<u64>()
            .map_err(|_| PreferenceError::UnsupportedInterval(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs())
    }
}

// ---------------------------------------------------------------------------
// Subreddit
// ---------------------------------------------------------------------------

/// A validated subreddit name, without the `r/` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subreddit(String);

impl Subreddit {
    /// Subreddits offered by the navbar menu, in menu order.
    pub const CHOICES: [&'static str; 3] = ["superstonk", "politics", "all"];

    /// Parse a subreddit name, accepting an optional `r/` or `/r/` prefix.
    pub fn new(name: &str) -> Result<Self, PreferenceError> {
        let name = name.trim();
        let name = name
            .strip_prefix("/r/")
            .or_else(|| name.strip_prefix("r/"))
            .unwrap_or(name);

        if name.is_empty() {
            return Err(PreferenceError::EmptySubreddit);
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PreferenceError::InvalidSubreddit(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// The `index`-th menu entry, if there is one.
    pub fn choice(index: usize) -> Option<Self> {
        Self::CHOICES.get(index).map(|name| Self((*name).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The next menu entry.  A subreddit that is not on the menu (set from
    /// the command line) moves to the first entry.
    pub fn next_choice(&self) -> Self {
        let next = match Self::CHOICES.iter().position(|c| *c == self.0) {
            Some(idx) => (idx + 1) % Self::CHOICES.len(),
            None => 0,
        };
        Self(Self::CHOICES[next].to_string())
    }
}

impl Default for Subreddit {
    fn default() -> Self {
        Self("all".to_string())
    }
}

impl FromStr for Subreddit {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Theme and view mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Default,
    Classic,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Default => Theme::Classic,
            Theme::Classic => Theme::Default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Classic => "classic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::List => "list",
            ViewMode::Grid => "grid",
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences + store
// ---------------------------------------------------------------------------

/// Snapshot of every user preference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub refresh_interval: RefreshInterval,
    pub subreddit: Subreddit,
    pub theme: Theme,
    pub view_mode: ViewMode,
}

/// Single-writer container for [`Preferences`].
///
/// Writes are synchronous and visible to every reader immediately.
/// Subscribers are woken only when a setter actually changes a value, so
/// re-selecting the current subreddit does not restart polling.
pub struct PreferenceStore {
    tx: watch::Sender<Preferences>,
}

impl PreferenceStore {
    pub fn new(initial: Preferences) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Read-only view that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Preferences {
        self.tx.borrow().clone()
    }

    pub fn refresh_interval(&self) -> RefreshInterval {
        self.tx.borrow().refresh_interval
    }

    pub fn subreddit(&self) -> Subreddit {
        self.tx.borrow().subreddit.clone()
    }

    pub fn theme(&self) -> Theme {
        self.tx.borrow().theme
    }

    pub fn view_mode(&self) -> ViewMode {
        self.tx.borrow().view_mode
    }

    pub fn set_refresh_interval(&self, interval: RefreshInterval) {
        let changed = self.tx.send_if_modified(|p| {
            replace_if_different(&mut p.refresh_interval, interval)
        });
        if changed {
            info!(interval = %interval, "refresh interval changed");
        }
    }

    pub fn set_subreddit(&self, subreddit: Subreddit) {
        let name = subreddit.to_string();
        let changed = self
            .tx
            .send_if_modified(|p| replace_if_different(&mut p.subreddit, subreddit));
        if changed {
            info!(subreddit = %name, "subreddit changed");
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        if self.tx.send_if_modified(|p| replace_if_different(&mut p.theme, theme)) {
            info!(theme = theme.label(), "theme changed");
        }
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        if self
            .tx
            .send_if_modified(|p| replace_if_different(&mut p.view_mode, mode))
        {
            info!(view_mode = mode.label(), "view mode changed");
        }
    }

    // -- menu helpers ----------------------------------------------------------

    pub fn cycle_refresh_interval(&self) {
        self.set_refresh_interval(self.refresh_interval().next());
    }

    pub fn cycle_subreddit(&self) {
        self.set_subreddit(self.subreddit().next_choice());
    }

    /// Select the `index`-th menu subreddit; out-of-range indexes are ignored.
    pub fn select_subreddit_choice(&self, index: usize) {
        if let Some(subreddit) = Subreddit::choice(index) {
            self.set_subreddit(subreddit);
        }
    }

    pub fn toggle_theme(&self) {
        self.set_theme(self.theme().toggled());
    }

    pub fn toggle_view_mode(&self) {
        self.set_view_mode(self.view_mode().toggled());
    }
}

fn replace_if_different<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str) -> Subreddit {
        Subreddit::new(name).unwrap()
    }

    // -- value types -----------------------------------------------------------

    #[test]
    fn defaults_match_first_launch() {
        let prefs = Preferences::default();
        assert_eq!(prefs.refresh_interval.as_secs(), 60);
        assert_eq!(prefs.subreddit.as_str(), "all");
        assert_eq!(prefs.theme, Theme::Default);
        assert_eq!(prefs.view_mode, ViewMode::List);
    }

    #[test]
    fn interval_accepts_only_menu_values() {
        for secs in [30u64, 60, 120, 600] {
            assert_eq!(RefreshInterval::try_from(secs).unwrap().as_secs(), secs);
        }
        assert_eq!(
            RefreshInterval::try_from(45u64),
            Err(PreferenceError::UnsupportedInterval("45".into()))
        );
        assert!("0".parse::<RefreshInterval>().is_err());
        assert!("soon".parse::<RefreshInterval>().is_err());
    }

    #[test]
    fn interval_parses_optional_seconds_suffix() {
        assert_eq!("120s".parse::<RefreshInterval>().unwrap(), RefreshInterval::Secs120);
        assert_eq!(" 30 ".parse::<RefreshInterval>().unwrap(), RefreshInterval::Secs30);
        assert_eq!(
            "60sss".parse::<RefreshInterval>(),
            Err(PreferenceError::UnsupportedInterval("60sss".into()))
        );
    }

    #[test]
    fn interval_cycles_through_menu_and_wraps() {
        let mut seen = vec![];
        let mut i = RefreshInterval::Secs30;
        for _ in 0..5 {
            seen.push(i.as_secs());
            i = i.next();
        }
        assert_eq!(seen, vec![30, 60, 120, 600, 30]);
    }

    #[test]
    fn subreddit_strips_prefix() {
        assert_eq!(sub("r/news").as_str(), "news");
        assert_eq!(sub("/r/AskReddit").as_str(), "AskReddit");
        assert_eq!(sub("all").to_string(), "r/all");
    }

    #[test]
    fn subreddit_rejects_empty_and_garbage() {
        assert_eq!(Subreddit::new(""), Err(PreferenceError::EmptySubreddit));
        assert_eq!(Subreddit::new("r/"), Err(PreferenceError::EmptySubreddit));
        assert!(matches!(
            Subreddit::new("news/../top"),
            Err(PreferenceError::InvalidSubreddit(_))
        ));
    }

    #[test]
    fn subreddit_menu_cycles_and_recovers_from_custom() {
        assert_eq!(sub("superstonk").next_choice(), sub("politics"));
        assert_eq!(sub("all").next_choice(), sub("superstonk"));
        assert_eq!(sub("rust").next_choice(), sub("superstonk"));
        assert_eq!(Subreddit::choice(1), Some(sub("politics")));
        assert_eq!(Subreddit::choice(3), None);
    }

    // -- store -----------------------------------------------------------------

    #[test]
    fn setters_are_immediately_visible() {
        let store = PreferenceStore::new(Preferences::default());

        store.set_refresh_interval(RefreshInterval::Secs600);
        store.set_subreddit(sub("politics"));
        store.set_theme(Theme::Classic);
        store.set_view_mode(ViewMode::Grid);

        assert_eq!(store.refresh_interval(), RefreshInterval::Secs600);
        assert_eq!(store.subreddit(), sub("politics"));
        assert_eq!(store.theme(), Theme::Classic);
        assert_eq!(store.view_mode(), ViewMode::Grid);
        assert_eq!(store.snapshot().subreddit, sub("politics"));
    }

    #[test]
    fn subscribers_see_changes() {
        let store = PreferenceStore::new(Preferences::default());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.set_subreddit(sub("superstonk"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().subreddit, sub("superstonk"));
    }

    #[test]
    fn setting_same_value_does_not_notify() {
        let store = PreferenceStore::new(Preferences::default());
        let rx = store.subscribe();

        store.set_subreddit(sub("all"));
        store.set_refresh_interval(RefreshInterval::Secs60);
        store.set_theme(Theme::Default);
        store.set_view_mode(ViewMode::List);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn menu_helpers_mutate_store() {
        let store = PreferenceStore::new(Preferences::default());

        store.cycle_refresh_interval();
        assert_eq!(store.refresh_interval(), RefreshInterval::Secs120);

        store.cycle_subreddit();
        assert_eq!(store.subreddit(), sub("superstonk"));

        store.select_subreddit_choice(1);
        assert_eq!(store.subreddit(), sub("politics"));
        store.select_subreddit_choice(9);
        assert_eq!(store.subreddit(), sub("politics"));

        store.toggle_theme();
        store.toggle_view_mode();
        assert_eq!(store.theme(), Theme::Classic);
        assert_eq!(store.view_mode(), ViewMode::Grid);
    }
}
