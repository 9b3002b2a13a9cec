use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use cerebro_core::SearchResult;

use super::spinner_char;
use crate::app::App;
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);
    render_input(f, chunks[0], app, theme);
    render_result(f, chunks[1], app, theme);
}

fn render_input(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let input = Paragraph::new(Span::styled(
        app.search_input.display(),
        Style::default().fg(theme.text),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .title(" Ask anything "),
    );
    f.render_widget(input, area);

    let max_x = area.x + area.width.saturating_sub(2);
    let x = (area.x + 1 + app.search_input.display_cursor() as u16).min(max_x);
    f.set_cursor_position(Position::new(x, area.y + 1));
}

fn render_result(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let busy = app.client.search_state().is_busy();
    let title = match (&app.shown_query, busy) {
        (_, true) => format!(" {} Searching\u{2026} ", spinner_char(app.tick)),
        (Some(q), false) => format!(" {q} "),
        (None, false) => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);

    let lines = match app.client.search_result() {
        Some(result) => result_lines(result, theme),
        None => vec![Line::from(Span::styled(
            "Type a question and press Enter.",
            Style::default().fg(theme.dim),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(paragraph, area);
}

fn result_lines<'a>(result: &'a SearchResult, theme: &Theme) -> Vec<Line<'a>> {
    let heading = |text: &'a str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![heading("AI Answer")];
    if result.ai_answer.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "(no answer)",
            Style::default().fg(theme.dim),
        )));
    } else {
        lines.extend(result.ai_answer.lines().map(|l| {
            Line::from(Span::styled(l, Style::default().fg(theme.answer)))
        }));
    }

    if !result.web_results.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Web Results"));
        for (i, web) in result.web_results.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(theme.dim)),
                Span::styled(
                    web.title.as_str(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", web.link),
                Style::default()
                    .fg(theme.link)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            if !web.snippet.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", web.snippet),
                    Style::default().fg(theme.dim),
                )));
            }
        }
    }
    lines
}
