use ratatui::style::{Color, Modifier, Style};

use cerebro_core::ThemePreference;

/// Color palette for the TUI.
pub struct Theme {
    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub link: Color,
    pub error: Color,
    pub notice: Color,
    pub answer: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    pub fn for_preference(preference: ThemePreference) -> Self {
        match preference {
            ThemePreference::Dark => Self::dark(),
            ThemePreference::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            link: Color::Cyan,
            error: Color::Rgb(255, 80, 80),
            notice: Color::Rgb(0, 200, 80),
            answer: Color::Rgb(230, 230, 240),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    pub fn light() -> Self {
        Self {
            header_fg: Color::White,
            header_bg: Color::Rgb(40, 90, 170),
            border: Color::Rgb(170, 170, 185),
            text: Color::Black,
            dim: Color::Rgb(110, 110, 125),
            highlight_bg: Color::Rgb(215, 228, 250),
            active: Color::Rgb(20, 90, 200),
            spinner: Color::Rgb(20, 90, 200),
            link: Color::Rgb(0, 110, 150),
            error: Color::Rgb(190, 20, 20),
            notice: Color::Rgb(0, 130, 50),
            answer: Color::Rgb(25, 25, 35),
            footer_fg: Color::Rgb(110, 110, 125),
            footer_bg: Color::Reset,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.active)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn notice_style(&self) -> Style {
        Style::default().fg(self.notice)
    }
}
