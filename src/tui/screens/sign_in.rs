//! Sign-in screen
//!
//! Holds the form state and runs the submit flow:
//! clear errors → validate → loading on → request token → credential
//! exchange → loading off → navigate to the main screen.
//!
//! Validation problems are shown inline under each field. Any other failure
//! (token fetch, exchange, storage) ends in the same generic alert; the
//! underlying error only goes to the log.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use secrecy::SecretString;
use tracing::warn;

use crate::auth::{
    self, validate_sign_in, CredentialExchange, Field, FieldErrors, RequestTokenSource, Session,
    SignInCredentials,
};
use crate::error::Result;
use crate::tui::app::{Navigator, Screen};
use crate::tui::event::{is_dismiss_key, is_focus_next_key, is_focus_prev_key, typed_char};
use crate::tui::theme::Theme;
use crate::tui::ui::centered_rect;

/// Title of the alert shown when signing in fails
pub const ALERT_TITLE: &str = "Authentication error";

/// Body of the alert shown when signing in fails
pub const ALERT_MESSAGE: &str = "Something went wrong while signing in. Check your credentials.";

const SPINNER: &[&str] = &["\u{25d0}", "\u{25d3}", "\u{25d1}", "\u{25d2}"]; // ◐ ◓ ◑ ◒

/// A dismissible message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    /// The generic sign-in failure alert
    pub fn authentication_failed() -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: ALERT_MESSAGE.to_string(),
        }
    }
}

/// How a submit attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened
    Ignored,
    /// Validation failed; messages are shown inline
    Invalid,
    /// Remote or unexpected failure; the alert is shown
    Failed,
    /// A session was established
    SignedIn,
}

/// What the app should do after a key press on this screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInAction {
    None,
    Submit,
}

/// Sign-in form state
#[derive(Debug)]
pub struct SignInScreen {
    pub username: String,
    pub password: String,
    /// Field receiving keystrokes
    pub focus: Field,
    /// Inline validation messages from the last submit
    pub field_errors: FieldErrors,
    /// True from a valid submit until its outcome is known
    pub loading: bool,
    /// Generic failure alert, if showing
    pub alert: Option<Alert>,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
            field_errors: FieldErrors::new(),
            loading: false,
            alert: None,
        }
    }

    /// Start a submit attempt
    ///
    /// Returns the credentials to send when the form is valid, with loading
    /// switched on. A submit while another is in flight is ignored.
    pub fn begin_submit(&mut self) -> std::result::Result<SignInCredentials, SubmitOutcome> {
        if self.loading {
            return Err(SubmitOutcome::Ignored);
        }

        self.field_errors.clear();

        if let Err(errors) = validate_sign_in(&self.username, &self.password) {
            if let Some(first) = errors.fields().next() {
                self.focus = first;
            }
            self.field_errors = errors;
            return Err(SubmitOutcome::Invalid);
        }

        self.loading = true;
        Ok(SignInCredentials {
            username: self.username.clone(),
            password: SecretString::from(self.password.clone()),
        })
    }

    /// Finish a submit attempt with the result of the credential exchange
    pub fn complete(&mut self, result: &Result<Session>) -> SubmitOutcome {
        self.loading = false;

        match result {
            Ok(_) => {
                self.username.clear();
                self.password.clear();
                self.focus = Field::Username;
                SubmitOutcome::SignedIn
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                self.alert = Some(Alert::authentication_failed());
                SubmitOutcome::Failed
            }
        }
    }

    /// Run a whole submit attempt and navigate to the main screen on success
    pub async fn submit<T, E, N>(
        &mut self,
        tokens: &T,
        exchange: &E,
        navigator: &mut N,
    ) -> SubmitOutcome
    where
        T: RequestTokenSource + ?Sized,
        E: CredentialExchange + ?Sized,
        N: Navigator + ?Sized,
    {
        let credentials = match self.begin_submit() {
            Ok(credentials) => credentials,
            Err(outcome) => return outcome,
        };

        let result = auth::authenticate(tokens, exchange, credentials).await;
        let outcome = self.complete(&result);

        if outcome == SubmitOutcome::SignedIn {
            navigator.navigate(Screen::Main);
        }
        outcome
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> SignInAction {
        // The loading overlay swallows input
        if self.loading {
            return SignInAction::None;
        }

        if self.alert.is_some() {
            if is_dismiss_key(&key) {
                self.alert = None;
            }
            return SignInAction::None;
        }

        if is_focus_next_key(&key) {
            self.focus = self.focus.next();
            return SignInAction::None;
        }
        if is_focus_prev_key(&key) {
            self.focus = self.focus.previous();
            return SignInAction::None;
        }

        match key.code {
            KeyCode::Enter => match self.focus {
                Field::Username => {
                    self.focus = Field::Password;
                    SignInAction::None
                }
                Field::Password => SignInAction::Submit,
            },
            KeyCode::Backspace => {
                self.focused_value_mut().pop();
                SignInAction::None
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.focused_value_mut().push(c);
                }
                SignInAction::None
            }
        }
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }
}

impl Default for SignInScreen {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render the sign-in screen
pub fn render(frame: &mut Frame, area: Rect, screen: &SignInScreen, tick_counter: u64) {
    let form_area = centered_rect(area, 52, 17);

    let block = Block::default()
        .title(" Sign in to TMDB ")
        .borders(Borders::ALL)
        .border_style(Theme::normal());
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Username
            Constraint::Length(1), // Username error
            Constraint::Length(3), // Password
            Constraint::Length(1), // Password error
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Button
            Constraint::Min(0),    // Hints
        ])
        .split(inner);

    render_input(frame, rows[0], screen, Field::Username, screen.username.clone());
    render_field_error(frame, rows[1], screen.field_errors.first(Field::Username));

    let masked = "•".repeat(screen.password.chars().count());
    render_input(frame, rows[2], screen, Field::Password, masked);
    render_field_error(frame, rows[3], screen.field_errors.first(Field::Password));

    let button = Paragraph::new("[ Sign in ]")
        .alignment(Alignment::Center)
        .style(Theme::button(screen.focus == Field::Password));
    frame.render_widget(button, rows[5]);

    let hints = Paragraph::new("[Tab] Next field  [Enter] Sign in  [Ctrl+C] Quit")
        .alignment(Alignment::Center)
        .style(Theme::muted());
    frame.render_widget(hints, rows[6]);

    if screen.loading {
        render_loading_overlay(frame, area, tick_counter);
    }

    if let Some(alert) = &screen.alert {
        render_alert(frame, area, alert);
    }
}

fn render_input(frame: &mut Frame, area: Rect, screen: &SignInScreen, field: Field, text: String) {
    let focused = screen.focus == field && !screen.loading;
    let has_error = screen.field_errors.contains(field);

    let mut spans = vec![Span::raw(text)];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Theme::FOCUS)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(format!(" {} ", field.label()))
            .borders(Borders::ALL)
            .border_style(Theme::input_border(focused, has_error)),
    );
    frame.render_widget(input, area);
}

fn render_field_error(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        let error = Paragraph::new(format!(" {}", message)).style(Theme::field_error());
        frame.render_widget(error, area);
    }
}

/// Blocking overlay shown while the request is in flight
fn render_loading_overlay(frame: &mut Frame, area: Rect, tick_counter: u64) {
    let popup_area = centered_rect(area, 30, 3);
    frame.render_widget(Clear, popup_area);

    let spinner = SPINNER[tick_counter as usize % SPINNER.len()];
    let loading = Paragraph::new(format!("{} Signing in...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Theme::SUCCESS))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, popup_area);
}

fn render_alert(frame: &mut Frame, area: Rect, alert: &Alert) {
    let popup_area = centered_rect(area, 50, 7);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(alert.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Theme::muted())),
    ];
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", alert.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::ERROR)),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(popup, popup_area);
}
