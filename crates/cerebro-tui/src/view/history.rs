use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use cerebro_core::models::HISTORY_WINDOWS;

use super::{spinner_char, truncate};
use crate::app::App;
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);
    render_window_bar(f, chunks[0], app, theme);
    render_table(f, chunks[1], app, theme);
}

fn render_window_bar(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let query = app.client.history().query();
    let mut spans = vec![Span::styled(" Window: ", Style::default().fg(theme.dim))];
    for days in HISTORY_WINDOWS {
        let label = format!(" {days}d ");
        if days == query.days {
            spans.push(Span::styled(label, theme.header_style()));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.dim)));
        }
    }
    if !HISTORY_WINDOWS.contains(&query.days) {
        spans.push(Span::styled(format!(" {}d ", query.days), theme.header_style()));
    }
    spans.push(Span::styled(
        format!("   Page {}", query.page),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    ));
    if app.client.history().is_loading() {
        spans.push(Span::styled(
            format!("  {} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let history = app.client.history();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Past queries ");

    if history.entries().is_empty() {
        let message = if history.is_loading() {
            "Loading\u{2026}".to_string()
        } else {
            format!("No queries in the last {} days.", history.query().days)
        };
        f.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim))).block(block),
            area,
        );
        return;
    }

    let header = Row::new(["When", "Query", ""].map(|h| {
        Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let query_width = (area.width as usize).saturating_sub(24);
    let rows: Vec<Row> = history
        .entries()
        .iter()
        .map(|entry| {
            let when = entry
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string();
            let marker = if entry.has_answer() { "\u{25CF}" } else { " " };
            Row::new(vec![
                Cell::from(when).style(Style::default().fg(theme.dim)),
                Cell::from(truncate(&entry.query_text, query_width))
                    .style(Style::default().fg(theme.text)),
                Cell::from(marker).style(Style::default().fg(theme.notice)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Min(10),
        Constraint::Length(2),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default().with_selected(Some(app.history_cursor));
    f.render_stateful_widget(table, area, &mut state);
}
