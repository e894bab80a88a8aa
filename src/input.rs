//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  The keys that replace the
//! navbar menus write straight to the [`PreferenceStore`](crate::prefs::PreferenceStore);
//! the poller picks the change up on its own.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] or the preference store for the action.
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `KEY_HELP` in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,

        // navigation
        KeyCode::Down | KeyCode::Char('j') => app.select_row_below(),
        KeyCode::Up | KeyCode::Char('k') => app.select_row_above(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        // menus
        KeyCode::Char('s') => app.prefs.cycle_subreddit(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            app.prefs.select_subreddit_choice(index);
        }
        KeyCode::Char('i') => app.prefs.cycle_refresh_interval(),
        KeyCode::Char('t') => app.prefs.toggle_theme(),
        KeyCode::Char('v') => app.prefs.toggle_view_mode(),
        _ => {}
    }
}
