//! Main screen, shown once a session exists

use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::tui::theme::Theme;

/// Render this screen
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    match &app.session {
        Some(session) => {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("✓ ", Style::default().fg(Theme::SUCCESS)),
                Span::styled(format!("Welcome, {}", session.username), Theme::title()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  Signed in {}", format_relative_time(session.created_at)),
                Theme::muted(),
            )));
        }
        None => lines.push(Line::from(Span::styled("  No active session", Theme::muted()))),
    }

    lines.push(Line::from(""));
    if app.sign_out_loading {
        lines.push(Line::from(Span::styled(
            "  Signing out...",
            Style::default().fg(Theme::FOCUS),
        )));
    } else {
        lines.push(Line::from("  [o] Sign out"));
        lines.push(Line::from("  [q] Quit"));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Main ")
            .borders(Borders::ALL)
            .border_style(Theme::normal()),
    );
    frame.render_widget(paragraph, area);
}

/// Format a timestamp relative to now
fn format_relative_time(dt: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_relative_time() {
        assert_eq!(format_relative_time(Utc::now()), "just now");
        assert_eq!(
            format_relative_time(Utc::now() - Duration::minutes(5)),
            "5m ago"
        );
        assert_eq!(format_relative_time(Utc::now() - Duration::hours(3)), "3h ago");
        assert_eq!(format_relative_time(Utc::now() - Duration::days(2)), "2d ago");
    }
}
