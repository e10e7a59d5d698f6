//! Main UI renderer

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Screen};
use crate::tui::screens::{home, sign_in};
use crate::tui::theme::Theme;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Render help overlay on top if active
    if app.show_help {
        render_help_overlay(frame, app);
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// `percent`% of a terminal dimension, without u16 overflow
fn percent_of(value: u16, percent: u16) -> u16 {
    (u32::from(value) * u32::from(percent) / 100) as u16
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" reel │ {} ", app.current_screen.title());

    let header = Paragraph::new(title)
        .style(Theme::header())
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Render the main content area based on current screen
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.current_screen {
        Screen::SignIn => sign_in::render(frame, area, &app.sign_in, app.tick_counter),
        Screen::Main => home::render(frame, area, app),
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(msg) = &app.status_message {
        format!(" {} ", msg)
    } else {
        match (&app.session, app.current_screen) {
            (Some(session), Screen::Main) => {
                format!(" Signed in as {} │ ? for help ", session.username)
            }
            _ => " Not signed in │ F1 for help │ Ctrl+C to quit ".to_string(),
        }
    };

    let status = Paragraph::new(status_text)
        .style(Theme::status_bar())
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // 60% width, 70% height, capped
    let popup_area = centered_rect(
        area,
        percent_of(area.width, 60).min(60),
        percent_of(area.height, 70).min(12),
    );

    frame.render_widget(Clear, popup_area);

    let (title, help_lines) = get_help_content(app.current_screen);

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help, popup_area);
}

/// Get help content for the current screen
fn get_help_content(screen: Screen) -> (&'static str, Vec<(&'static str, &'static str)>) {
    match screen {
        Screen::SignIn => (
            "Help - Sign In",
            vec![
                ("Tab / ↓", "Next field"),
                ("S-Tab / ↑", "Previous field"),
                ("Enter", "Next field / Sign in"),
                ("Ctrl+C", "Quit"),
                ("F1", "Show this help"),
            ],
        ),
        Screen::Main => (
            "Help - Main",
            vec![
                ("o", "Sign out"),
                ("q / Esc", "Quit"),
                ("Ctrl+C", "Quit"),
                ("?", "Show this help"),
            ],
        ),
    }
}
