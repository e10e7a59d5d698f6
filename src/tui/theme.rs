//! TUI theme and styles

use ratatui::style::{Color, Modifier, Style};

/// Application color theme
pub struct Theme;

impl Theme {
    /// Primary accent color
    pub const PRIMARY: Color = Color::Cyan;

    /// Focused input color
    pub const FOCUS: Color = Color::Yellow;

    /// Success color
    pub const SUCCESS: Color = Color::Green;

    /// Error color
    pub const ERROR: Color = Color::Red;

    /// Muted text color
    pub const MUTED: Color = Color::DarkGray;

    /// Header style
    pub fn header() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().bg(Color::DarkGray)
    }

    /// Normal text style
    pub fn normal() -> Style {
        Style::default()
    }

    /// Muted text style
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    /// Title text style
    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Border of a form input, by state
    pub fn input_border(focused: bool, has_error: bool) -> Style {
        if has_error {
            Style::default().fg(Self::ERROR)
        } else if focused {
            Style::default().fg(Self::FOCUS)
        } else {
            Self::normal()
        }
    }

    /// Inline validation message
    pub fn field_error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Submit button, highlighted when the form is ready to send
    pub fn button(active: bool) -> Style {
        if active {
            Style::default()
                .bg(Self::PRIMARY)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::PRIMARY)
        }
    }
}
