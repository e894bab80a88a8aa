//! Application state.
//!
//! [`App`] owns the [`PreferenceStore`], the displayed post list and the
//! scroll position.  Rendering lives in [`crate::ui`], key handling in
//! [`crate::input`].

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;
use tracing::debug;

use crate::loading::LoadingIndicator;
use crate::poll::FeedUpdate;
use crate::prefs::{PreferenceStore, Subreddit, ViewMode};
use crate::source::FeedItem;

pub struct App {
    /// The last successfully fetched list, in source order.
    pub items: Vec<FeedItem>,
    /// Subreddit `items` came from.
    pub shown: Option<Subreddit>,
    /// Selection state, shared by the list and grid views.
    pub list_state: ListState,
    pub prefs: PreferenceStore,
    pub loading: LoadingIndicator,
    /// When `items` was fetched.
    pub last_update: Option<DateTime<Utc>>,
    /// Cards per grid row at the last draw.
    pub grid_columns: usize,
    /// Redraw tick counter, drives the loading animation.
    pub tick: u64,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl App {
    pub fn new(prefs: PreferenceStore, loading: LoadingIndicator) -> Self {
        Self {
            items: Vec::new(),
            shown: None,
            list_state: ListState::default(),
            prefs,
            loading,
            last_update: None,
            grid_columns: 1,
            tick: 0,
            quit: false,
        }
    }

    /// Replace the displayed list with a freshly fetched one.
    ///
    /// Updates for a subreddit that is no longer selected are dropped: the
    /// user switched away after that fetch started.  Returns whether the
    /// list was replaced.
    pub fn apply_update(&mut self, update: FeedUpdate) -> bool {
        if update.subreddit != self.prefs.subreddit() {
            debug!(
                generation = update.generation,
                subreddit = %update.subreddit,
                "update for deselected subreddit dropped"
            );
            return false;
        }

        let switched = self.shown.as_ref() != Some(&update.subreddit);
        self.items = update.items;
        self.shown = Some(update.subreddit);
        self.last_update = Some(update.fetched_at);

        if switched || self.items.is_empty() {
            self.list_state.select(None);
        } else if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.min(self.items.len() - 1)));
        }
        true
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        self.select_forward(1);
    }

    pub fn select_previous(&mut self) {
        self.select_backward(1);
    }

    /// Move down one row: one post in the list, one row of cards in the grid.
    pub fn select_row_below(&mut self) {
        self.select_forward(self.row_len());
    }

    pub fn select_row_above(&mut self) {
        self.select_backward(self.row_len());
    }

    fn row_len(&self) -> usize {
        match self.prefs.view_mode() {
            ViewMode::List => 1,
            ViewMode::Grid => self.grid_columns.max(1),
        }
    }

    fn select_forward(&mut self, step: usize) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + step).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_backward(&mut self, step: usize) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(step),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::LoadingSignal;
    use crate::prefs::Preferences;
    use chrono::TimeZone;

    fn make_item(id: &str, score: i64) -> FeedItem {
        FeedItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            link: format!("https://example.com/{id}"),
            score,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            author: "author".to_string(),
            num_comments: 3,
            permalink: format!("https://www.reddit.com/r/all/comments/{id}/"),
        }
    }

    fn sample_items() -> Vec<FeedItem> {
        vec![make_item("1", 900), make_item("2", 50), make_item("3", 7)]
    }

    fn update(subreddit: &str, items: Vec<FeedItem>) -> FeedUpdate {
        FeedUpdate {
            generation: 1,
            subreddit: Subreddit::new(subreddit).unwrap(),
            items,
            fetched_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 5, 0).unwrap(),
        }
    }

    fn new_app() -> App {
        let (_signal, indicator) = LoadingSignal::new();
        App::new(PreferenceStore::new(Preferences::default()), indicator)
    }

    fn app_with_items() -> App {
        let mut app = new_app();
        app.apply_update(update("all", sample_items()));
        app
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = new_app();
        assert!(app.items.is_empty());
        assert!(app.last_update.is_none());
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
    }

    // -- apply_update --------------------------------------------------------

    #[test]
    fn apply_update_keeps_source_order_and_values() {
        let app = app_with_items();
        assert_eq!(app.items, sample_items());
        assert_eq!(app.shown, Some(Subreddit::new("all").unwrap()));
        assert!(app.last_update.is_some());
    }

    #[test]
    fn apply_update_replaces_instead_of_merging() {
        let mut app = app_with_items();
        app.apply_update(update("all", vec![make_item("9", 1)]));
        assert_eq!(app.items.len(), 1);
        assert_eq!(app.items[0].id, "9");
    }

    #[test]
    fn apply_update_ignores_deselected_subreddit() {
        let mut app = app_with_items();
        let before = app.items.clone();

        let applied = app.apply_update(update("politics", vec![make_item("p", 1)]));

        assert!(!applied);
        assert_eq!(app.items, before, "displayed list untouched");
    }

    #[test]
    fn apply_update_clamps_selection() {
        let mut app = app_with_items();
        app.select_last();
        app.apply_update(update("all", vec![make_item("a", 1), make_item("b", 2)]));
        assert_eq!(app.list_state.selected(), Some(1));

        app.apply_update(update("all", vec![]));
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn switching_subreddit_resets_selection() {
        let mut app = app_with_items();
        app.select_last();

        app.prefs.select_subreddit_choice(1);
        app.apply_update(update("politics", sample_items()));

        assert_eq!(app.shown, Some(Subreddit::new("politics").unwrap()));
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn selected_item_follows_selection() {
        let mut app = app_with_items();
        assert!(app.selected_item().is_none());
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_item().map(|i| i.id.as_str()), Some("2"));
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = new_app();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances_and_clamps() {
        let mut app = app_with_items();

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_moves_up_and_clamps() {
        let mut app = app_with_items();

        app.select_last();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_previous();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_first_and_last_jump() {
        let mut app = app_with_items();
        app.select_last();
        assert_eq!(app.list_state.selected(), Some(2));
        app.select_first();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn vertical_moves_step_a_whole_grid_row() {
        let mut app = new_app();
        app.apply_update(update("all", (0..10).map(|i| make_item(&i.to_string(), 1)).collect()));
        app.prefs.set_view_mode(ViewMode::Grid);
        app.grid_columns = 3;

        app.select_first();
        app.select_row_below();
        assert_eq!(app.list_state.selected(), Some(3));
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(4), "sideways moves one card");
        app.select_row_below();
        app.select_row_below();
        assert_eq!(app.list_state.selected(), Some(9), "clamped to the last card");
        app.select_row_above();
        assert_eq!(app.list_state.selected(), Some(6));
    }

    #[test]
    fn vertical_moves_step_one_post_in_list_view() {
        let mut app = app_with_items();
        app.grid_columns = 3;
        app.select_first();
        app.select_row_below();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_row_above();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn tick_wraps() {
        let mut app = new_app();
        app.tick = u64::MAX;
        app.on_tick();
        assert_eq!(app.tick, 0);
    }
}
