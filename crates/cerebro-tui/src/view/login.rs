use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{centered_rect, spinner_char};
use crate::app::App;
use crate::model::form::Form;
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let prompt = if app.auth_pending {
        format!("{} Signing in\u{2026}", spinner_char(app.tick))
    } else {
        "Log in to search".to_string()
    };
    render_form(f, theme, area, &app.login_form, " Log in ", &prompt);
}

/// Centered box with one bordered input per field. The focused field gets
/// the accent border and the terminal cursor.
pub fn render_form(f: &mut Frame, theme: &Theme, area: Rect, form: &Form, title: &str, prompt: &str) {
    let height = form.fields().len() as u16 * 3 + 4;
    let popup = centered_rect(52, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title);
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
    constraints.extend(form.fields().iter().map(|_| Constraint::Length(3)));
    let rows = Layout::vertical(constraints).split(inner);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {prompt}"),
            Style::default().fg(theme.dim),
        ))),
        rows[0],
    );

    for (i, field) in form.fields().iter().enumerate() {
        let focused = i == form.focus();
        let border = if focused {
            theme.focused_border_style()
        } else {
            theme.border_style()
        };
        let input_area = rows[i + 2];
        let input = Paragraph::new(Span::styled(
            field.input.display(),
            Style::default().fg(theme.text),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", field.label)),
        );
        f.render_widget(input, input_area);

        if focused {
            let max_x = input_area.x + input_area.width.saturating_sub(2);
            let x = (input_area.x + 1 + field.input.display_cursor() as u16).min(max_x);
            f.set_cursor_position(Position::new(x, input_area.y + 1));
        }
    }
}
