use ratatui::Frame;
use ratatui::layout::Rect;

use super::login::render_form;
use super::spinner_char;
use crate::app::App;
use crate::theme::Theme;

pub fn render_in(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let prompt = if app.auth_pending {
        format!("{} Creating account\u{2026}", spinner_char(app.tick))
    } else {
        "Create an account".to_string()
    };
    render_form(f, theme, area, &app.signup_form, " Sign up ", &prompt);
}
