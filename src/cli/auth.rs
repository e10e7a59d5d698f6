//! Authentication CLI command handlers

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::warn;

use crate::auth::{CredentialExchange, Field, SessionStore};
use crate::cli::commands::AuthCommand;
use crate::core::config::Config;
use crate::core::credentials::CredentialStore;
use crate::error::{ReelError, Result};
use crate::tmdb::{KeyringSessionStore, TmdbAuthenticator, TmdbClient};
use crate::tui::app::{Navigator, Screen};
use crate::tui::screens::sign_in::{Alert, SignInScreen, SubmitOutcome};

/// Handle authentication commands
pub async fn handle_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { username } => handle_login(username).await,
        AuthCommand::Logout => handle_logout().await,
        AuthCommand::Status => handle_status(),
    }
}

/// Records where a successful sign-in would take the user
#[derive(Debug, Default)]
struct CliNavigator {
    reached: Option<Screen>,
}

impl Navigator for CliNavigator {
    fn navigate(&mut self, screen: Screen) {
        self.reached = Some(screen);
    }
}

/// Handle the login command
async fn handle_login(username: Option<String>) -> Result<()> {
    let store = KeyringSessionStore;
    if let Some(session) = store.load()? {
        println!("✓ Already signed in as {}.", session.username);
        println!();
        println!("  To sign in again, first run: reel auth logout");
        return Ok(());
    }

    let config = Config::load()?;
    let client = Arc::new(TmdbClient::from_config(&config)?);
    let authenticator = TmdbAuthenticator::new(client.clone(), store);

    let mut screen = SignInScreen::new();
    screen.username = match username {
        Some(username) => username,
        None => prompt_line("Username: ")?,
    };
    screen.password = prompt_masked("Password: ")?;

    println!();
    println!("Signing in...");

    let mut navigator = CliNavigator::default();
    let outcome = screen
        .submit(&*client, &authenticator, &mut navigator)
        .await;

    let report = login_report(outcome, &screen, &navigator);
    for line in &report.stdout {
        println!("{}", line);
    }
    for line in &report.stderr {
        eprintln!("{}", line);
    }
    report.into_result()
}

/// Why a CLI sign-in did not produce a session
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoginFailure {
    /// Required fields were left empty
    Incomplete,
    /// The generic alert, as "title: message"
    Rejected(String),
}

/// What `auth login` prints once the form has been submitted
#[derive(Debug, Default, PartialEq, Eq)]
struct LoginReport {
    stdout: Vec<String>,
    stderr: Vec<String>,
    failure: Option<LoginFailure>,
}

impl LoginReport {
    fn into_result(self) -> Result<()> {
        match self.failure {
            None => Ok(()),
            Some(LoginFailure::Incomplete) => Err(ReelError::InvalidInput(
                "Sign-in form is incomplete".to_string(),
            )),
            Some(LoginFailure::Rejected(alert)) => Err(ReelError::AuthenticationFailed(alert)),
        }
    }
}

/// Map a submit outcome to CLI output
///
/// Only what the sign-in screen itself shows is reported: inline field
/// errors or the generic alert. The underlying error stays in the log.
fn login_report(
    outcome: SubmitOutcome,
    screen: &SignInScreen,
    navigator: &CliNavigator,
) -> LoginReport {
    let mut report = LoginReport::default();

    match outcome {
        SubmitOutcome::SignedIn => {
            report
                .stdout
                .push("✓ Successfully signed in to TMDB!".to_string());
            if navigator.reached == Some(Screen::Main) {
                report
                    .stdout
                    .push("  Run `reel` to open the main screen.".to_string());
            }
        }
        SubmitOutcome::Invalid => {
            for field in [Field::Username, Field::Password] {
                if let Some(message) = screen.field_errors.first(field) {
                    report
                        .stderr
                        .push(format!("  {}: {}", field.label(), message));
                }
            }
            report.failure = Some(LoginFailure::Incomplete);
        }
        SubmitOutcome::Failed => {
            let alert = screen
                .alert
                .clone()
                .unwrap_or_else(Alert::authentication_failed);
            report.failure = Some(LoginFailure::Rejected(format!(
                "{}: {}",
                alert.title, alert.message
            )));
        }
        SubmitOutcome::Ignored => {}
    }

    report
}

/// Handle the logout command
async fn handle_logout() -> Result<()> {
    let store = KeyringSessionStore;
    let Some(session) = store.load()? else {
        println!("Not currently signed in.");
        return Ok(());
    };

    let client = Config::load().and_then(|config| TmdbClient::from_config(&config));
    match client {
        Ok(client) => {
            TmdbAuthenticator::new(Arc::new(client), store)
                .sign_out(&session)
                .await?
        }
        Err(e) => {
            // Without a client only the local copy can go
            warn!(error = %e, "cannot reach TMDB, clearing local session only");
            store.clear()?;
        }
    }

    println!("Successfully signed out.");
    Ok(())
}

/// Handle the status command
fn handle_status() -> Result<()> {
    let session = KeyringSessionStore.load()?;
    let api_key = CredentialStore::get_api_key()?;

    println!("Authentication Status:");
    println!(
        "  TMDB API key: {}",
        match &api_key {
            Some(key) => CredentialStore::mask_token(key),
            None => "Not configured".to_string(),
        }
    );

    match session {
        Some(session) => {
            println!("  Session: Signed in as {}", session.username);
            println!(
                "  Session id: {}",
                CredentialStore::mask_token(&session.session_id)
            );
            println!(
                "  Signed in at: {}",
                session.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        None => println!("  Session: Not signed in"),
    }

    Ok(())
}

/// Print a prompt and read one line from stdin
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a line without echoing it, printing `*` per character
fn prompt_masked(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let result = read_masked();
    terminal::disable_raw_mode()?;
    println!();

    result
}

fn read_masked() -> Result<String> {
    let mut value = String::new();
    let mut stdout = io::stdout();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => return Ok(value),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(ReelError::InvalidInput("Sign-in cancelled".to_string()));
            }
            KeyCode::Backspace => {
                if value.pop().is_some() {
                    write!(stdout, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) => {
                value.push(c);
                write!(stdout, "*")?;
            }
            _ => {}
        }
        stdout.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockCredentialExchange, MockRequestTokenSource, RequestToken, Session};
    use crate::tui::screens::sign_in::{ALERT_MESSAGE, ALERT_TITLE};
    use chrono::Utc;
    use secrecy::{ExposeSecret, SecretString};

    fn screen_with(username: &str, password: &str) -> SignInScreen {
        let mut screen = SignInScreen::new();
        screen.username = username.to_string();
        screen.password = password.to_string();
        screen
    }

    fn token_source() -> MockRequestTokenSource {
        let mut tokens = MockRequestTokenSource::new();
        tokens
            .expect_new_request_token()
            .returning(|| Ok(RequestToken::new("abc123")));
        tokens
    }

    #[test]
    fn test_cli_navigator_records_screen() {
        let mut navigator = CliNavigator::default();
        assert!(navigator.reached.is_none());

        navigator.navigate(Screen::Main);
        assert_eq!(navigator.reached, Some(Screen::Main));
    }

    #[test]
    fn test_masked_session_id_hides_middle() {
        let id = SecretString::from("abcd1234567890efgh");
        let masked = CredentialStore::mask_token(&id);
        assert_eq!(masked, "abcd...efgh");
        assert_ne!(masked, id.expose_secret());
    }

    #[tokio::test]
    async fn test_login_report_lists_field_errors_on_stderr() {
        let mut tokens = MockRequestTokenSource::new();
        tokens.expect_new_request_token().never();
        let mut exchange = MockCredentialExchange::new();
        exchange.expect_sign_in().never();

        let mut screen = screen_with("", "");
        let mut navigator = CliNavigator::default();
        let outcome = screen.submit(&tokens, &exchange, &mut navigator).await;

        let report = login_report(outcome, &screen, &navigator);
        assert!(report.stdout.is_empty());
        assert_eq!(
            report.stderr,
            vec![
                "  Username: Username is required".to_string(),
                "  Password: Password is required".to_string(),
            ]
        );
        assert_eq!(report.failure, Some(LoginFailure::Incomplete));
        assert!(matches!(report.into_result(), Err(ReelError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_login_report_shows_only_generic_alert() {
        let mut exchange = MockCredentialExchange::new();
        exchange.expect_sign_in().returning(|_| {
            Err(ReelError::TmdbApi {
                status: 500,
                message: "upstream database timeout".to_string(),
            })
        });

        let mut screen = screen_with("bob", "pw");
        let mut navigator = CliNavigator::default();
        let outcome = screen
            .submit(&token_source(), &exchange, &mut navigator)
            .await;

        let report = login_report(outcome, &screen, &navigator);
        let expected = format!("{}: {}", ALERT_TITLE, ALERT_MESSAGE);
        assert_eq!(report.failure, Some(LoginFailure::Rejected(expected.clone())));
        assert!(report
            .stdout
            .iter()
            .chain(report.stderr.iter())
            .all(|line| !line.contains("upstream")));

        match report.into_result() {
            Err(e) => {
                let text = e.to_string();
                assert!(text.contains(&expected));
                assert!(!text.contains("upstream"));
            }
            Ok(()) => panic!("expected a failure"),
        }
    }

    #[tokio::test]
    async fn test_login_report_on_success() {
        let mut exchange = MockCredentialExchange::new();
        exchange.expect_sign_in().returning(|login| {
            Ok(Session {
                session_id: SecretString::from("sess-1"),
                username: login.username,
                created_at: Utc::now(),
            })
        });

        let mut screen = screen_with("bob", "pw");
        let mut navigator = CliNavigator::default();
        let outcome = screen
            .submit(&token_source(), &exchange, &mut navigator)
            .await;

        let report = login_report(outcome, &screen, &navigator);
        assert_eq!(report.stdout[0], "✓ Successfully signed in to TMDB!");
        assert_eq!(report.stdout.len(), 2);
        assert!(report.stderr.is_empty());
        assert!(report.into_result().is_ok());
    }
}
