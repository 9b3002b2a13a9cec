pub mod history;
pub mod login;
pub mod search;
pub mod signup;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use cerebro_core::ViewState;

use crate::app::App;
use crate::theme::Theme;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Draw the whole frame: header, active screen, status line, key hints.
pub fn render(f: &mut Frame, app: &App) {
    let theme = app.theme();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, chunks[0], app, &theme);
    match app.client.view() {
        ViewState::LoggedOutLogin => login::render_in(f, app, &theme, chunks[1]),
        ViewState::LoggedOutSignup => signup::render_in(f, app, &theme, chunks[1]),
        ViewState::LoggedInSearch => search::render_in(f, app, &theme, chunks[1]),
        ViewState::LoggedInHistory => history::render_in(f, app, &theme, chunks[1]),
    }
    render_status(f, chunks[2], app, &theme);
    render_footer(f, chunks[3], app, &theme);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let title = match app.client.view() {
        ViewState::LoggedOutLogin => "Log in",
        ViewState::LoggedOutSignup => "Sign up",
        ViewState::LoggedInSearch => "Search",
        ViewState::LoggedInHistory => "History",
    };
    let who = match app.client.user() {
        Some(user) => user.username.clone(),
        None if app.client.is_authenticated() => "signed in".to_string(),
        None => "signed out".to_string(),
    };
    let right = format!("{who} @ {}  [{}] ", app.api_url, app.client.theme());

    let left_spans = vec![
        Span::styled(" Cerebro ", theme.header_style()),
        Span::styled(
            format!(" {title}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    let left_width: usize = left_spans.iter().map(|s| s.content.chars().count()).sum();
    let room = (area.width as usize).saturating_sub(left_width + 1);
    let right = truncate(&right, room);
    let pad = room.saturating_sub(right.chars().count());

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(pad + 1)));
    spans.push(Span::styled(right, Style::default().fg(theme.dim)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let line = if let Some(err) = app.client.last_error() {
        Line::from(Span::styled(format!(" {err}"), theme.error_style()))
    } else if let Some(notice) = app.client.notice() {
        Line::from(Span::styled(format!(" {notice}"), theme.notice_style()))
    } else {
        Line::default()
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hints: &[(&str, &str)] = match app.client.view() {
        ViewState::LoggedOutLogin => &[
            ("Tab", "next field"),
            ("Enter", "log in"),
            ("^N", "sign up"),
            ("^T", "theme"),
            ("^C", "quit"),
        ],
        ViewState::LoggedOutSignup => &[
            ("Tab", "next field"),
            ("Enter", "create account"),
            ("Esc", "back"),
            ("^T", "theme"),
            ("^C", "quit"),
        ],
        ViewState::LoggedInSearch => &[
            ("Enter", "search"),
            ("\u{2191}\u{2193}", "scroll"),
            ("^O", "history"),
            ("^T", "theme"),
            ("^L", "log out"),
            ("^C", "quit"),
        ],
        ViewState::LoggedInHistory => &[
            ("j/k", "move"),
            ("Enter", "show answer"),
            ("d", "window"),
            ("n/p", "page"),
            ("r", "refresh"),
            ("Esc", "back"),
            ("t", "theme"),
            ("L", "log out"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, what) in hints {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(":{what} "), theme.footer_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
