//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Nothing in this module mutates
//! state other than the scroll position ratatui keeps in
//! [`App::list_state`].
//!
//! ## For contributors
//!
//! * The layout is four rows: navbar, loading bar, body, footer.
//! * The body is either a one-line-per-post list or a grid of cards,
//!   depending on the view mode preference.
//! * Colours come from [`crate::theme::palette`]; never hard-code one here.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::prefs::ViewMode;
use crate::source::FeedItem;
use crate::theme::{palette, Palette};

/// Minimum card width in grid view, borders included.
const CARD_MIN_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 6;
const MAX_GRID_COLUMNS: u16 = 4;

const CREDITS: &str = "Maintained with ❤ by bsord and jonfairbanks";
const REQUEST_LINK: &str = "Request a subreddit: github.com/Fairbanks-io/f5-client/issues/new";
const KEY_HELP: &str = "s/1-3: subreddit  i: interval  v: view  t: theme  ↑/↓: scroll  q: quit";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let prefs = app.prefs.snapshot();
    let colors = palette(prefs.theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(colors.background)),
        frame.area(),
    );

    let [nav_area, progress_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_navbar(app, frame, nav_area, &colors);
    frame.render_widget(
        Paragraph::new(progress_line(
            progress_area.width,
            app.tick,
            app.loading.is_loading(),
            &colors,
        )),
        progress_area,
    );

    if app.items.is_empty() {
        draw_empty(app, frame, body_area, &colors);
    } else {
        match prefs.view_mode {
            ViewMode::List => draw_list(app, frame, body_area, &colors),
            ViewMode::Grid => draw_grid(app, frame, body_area, &colors),
        }
    }

    draw_footer(app, frame, footer_area, &colors);
}

fn draw_navbar(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let prefs = app.prefs.snapshot();
    let bar = Style::default().bg(colors.navbar_bg).fg(colors.navbar_fg);

    let brand = Paragraph::new(Line::from(vec![
        Span::raw(" 🔥 "),
        Span::styled("F5 News", Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .style(bar);

    let menus = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} ▾", prefs.subreddit),
            Style::default().fg(colors.accent),
        ),
        Span::raw("   "),
        Span::raw(format!("⟳ {}", prefs.refresh_interval.label())),
        Span::raw("   "),
        Span::raw(format!("▦ {}", prefs.view_mode.label())),
        Span::raw("   "),
        Span::raw(format!("◐ {} ", prefs.theme.label())),
    ]))
    .alignment(Alignment::Right)
    .style(bar);

    frame.render_widget(brand, area);
    frame.render_widget(menus, area);
}

/// One row of bar characters.  While loading, a quarter-width segment
/// sweeps across the row as `tick` advances; otherwise the bar is empty.
pub fn progress_line(width: u16, tick: u64, loading: bool, colors: &Palette) -> Line<'static> {
    let width = usize::from(width);
    if !loading || width == 0 {
        return Line::from(Span::styled(
            "─".repeat(width),
            Style::default().fg(colors.border),
        ));
    }

    let segment = (width / 4).max(1);
    let start = (tick as usize).wrapping_mul(2) % width;
    let spans: Vec<Span> = (0..width)
        .map(|col| {
            let offset = (col + width - start) % width;
            if offset < segment {
                Span::styled("━", Style::default().fg(colors.progress))
            } else {
                Span::styled("─", Style::default().fg(colors.border))
            }
        })
        .collect();
    Line::from(spans)
}

fn body_block<'a>(title: String, colors: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
}

fn draw_empty(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let subreddit = app.prefs.subreddit();
    let message = if app.loading.is_loading() {
        format!("Loading {subreddit}…")
    } else {
        format!("Nothing from {subreddit} yet")
    };
    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors.dim))
        .block(body_block(format!(" {subreddit} "), colors));
    frame.render_widget(body, area);
}

fn meta_spans(item: &FeedItem, now: DateTime<Utc>, colors: &Palette) -> Vec<Span<'static>> {
    vec![Span::styled(
        format!(
            "{} · u/{} · {} comments",
            item.age_label(now),
            item.author,
            item.num_comments
        ),
        Style::default().fg(colors.dim),
    )]
}

fn draw_list(app: &mut App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let now = Utc::now();
    let list_items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>6} ", item.score_label()),
                    Style::default().fg(colors.score),
                ),
                Span::styled(item.title.clone(), Style::default().fg(colors.text)),
                Span::raw("  "),
            ];
            spans.extend(meta_spans(item, now, colors));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(list_items)
        .block(body_block(shown_title(app), colors))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(colors.highlight_bg),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn shown_title(app: &App) -> String {
    let subreddit = app.shown.clone().unwrap_or_else(|| app.prefs.subreddit());
    format!(" {subreddit} ")
}

/// Number of card columns that fit in `width`.
pub fn grid_columns(width: u16) -> u16 {
    (width / CARD_MIN_WIDTH).clamp(1, MAX_GRID_COLUMNS)
}

/// Index of the first card on the page that contains `selected`.
pub fn grid_page_start(selected: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    selected / per_page * per_page
}

fn draw_grid(app: &mut App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let outer = body_block(shown_title(app), colors);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = grid_columns(inner.width);
    app.grid_columns = usize::from(columns);
    let rows = (inner.height / CARD_HEIGHT).max(1);
    let per_page = usize::from(columns * rows);
    let selected = app.list_state.selected();
    let first = grid_page_start(selected.unwrap_or(0), per_page);

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); usize::from(rows)])
        .split(inner);
    let now = Utc::now();

    for (slot, item) in app.items.iter().enumerate().skip(first).take(per_page) {
        let position = slot - first;
        let row = position / usize::from(columns);
        let col = position % usize::from(columns);
        let Some(row_area) = row_areas.get(row) else {
            break;
        };
        let col_areas = Layout::horizontal(vec![
            Constraint::Ratio(1, u32::from(columns));
            usize::from(columns)
        ])
        .split(*row_area);

        draw_card(frame, col_areas[col], item, selected == Some(slot), now, colors);
    }
}

fn draw_card(
    frame: &mut Frame,
    area: Rect,
    item: &FeedItem,
    selected: bool,
    now: DateTime<Utc>,
    colors: &Palette,
) {
    let border = if selected { colors.accent } else { colors.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" ▲ {} ", item.score_label()),
            Style::default().fg(colors.score),
        ));

    let mut title_style = Style::default().fg(colors.text);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let card = Paragraph::new(vec![
        Line::from(Span::styled(item.title.clone(), title_style)),
        Line::from(meta_spans(item, now, colors)),
    ])
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(card, area);
}

fn draw_footer(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let updated = app
        .last_update
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());

    // The selected post's links take the credits line while something is
    // selected.
    let first_line = match app.selected_item() {
        Some(item) => Line::from(vec![
            Span::styled(format!(" ↗ {}", item.link), Style::default().fg(colors.accent)),
            Span::raw("  "),
            Span::styled(format!("💬 {}", item.permalink), Style::default().fg(colors.dim)),
        ]),
        None => Line::from(vec![
            Span::styled(format!(" {CREDITS}"), Style::default().fg(colors.dim)),
            Span::raw("  "),
            Span::styled(REQUEST_LINK, Style::default().fg(colors.dim)),
        ]),
    };

    let footer = Paragraph::new(vec![
        first_line,
        Line::from(vec![
            Span::styled(
                format!(" {} posts", app.items.len()),
                Style::default().fg(colors.accent),
            ),
            Span::styled(
                format!(" · updated {updated}  "),
                Style::default().fg(colors.dim),
            ),
            Span::raw(KEY_HELP),
        ]),
    ]);
    frame.render_widget(footer, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
