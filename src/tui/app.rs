//! Main TUI application state and logic

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::warn;

use crate::auth::{self, CredentialExchange, RequestTokenSource, Session};
use crate::error::{ReelError, Result};
use crate::tui::event::{is_quit_key, AppEvent, EventHandler};
use crate::tui::screens::sign_in::{SignInAction, SignInScreen, SubmitOutcome};
use crate::tui::ui;

/// Message type for async operation results
#[derive(Debug)]
pub enum AsyncMessage {
    /// Sign-in attempt finished (token fetch + credential exchange)
    SignInFinished(Result<Session>),
    /// Sign-out finished
    SignOutFinished(Result<()>),
}

/// Current screen in the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    Main,
}

impl Screen {
    /// Name shown in the header
    pub fn title(&self) -> &'static str {
        match self {
            Screen::SignIn => "Sign In",
            Screen::Main => "Main",
        }
    }
}

/// Moves the application between screens
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn navigate(&mut self, screen: Screen);
}

/// Main TUI application
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current screen
    pub current_screen: Screen,
    /// Sign-in form state
    pub sign_in: SignInScreen,
    /// Active session, once signed in
    pub session: Option<Session>,
    /// Whether a sign-out request is in flight
    pub sign_out_loading: bool,
    /// Status message to display
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Tick counter for spinner animation
    pub tick_counter: u64,
    /// Sender for async operation results
    pub async_tx: mpsc::Sender<AsyncMessage>,
    /// Receiver for async operation results
    pub async_rx: mpsc::Receiver<AsyncMessage>,

    tokens: Arc<dyn RequestTokenSource>,
    exchange: Arc<dyn CredentialExchange>,
}

impl App {
    /// Create a new app starting on the sign-in screen
    pub fn new(tokens: Arc<dyn RequestTokenSource>, exchange: Arc<dyn CredentialExchange>) -> Self {
        let (async_tx, async_rx) = mpsc::channel(32);

        Self {
            running: true,
            current_screen: Screen::SignIn,
            sign_in: SignInScreen::new(),
            session: None,
            sign_out_loading: false,
            status_message: None,
            show_help: false,
            tick_counter: 0,
            async_tx,
            async_rx,
            tokens,
            exchange,
        }
    }

    /// Resume a stored session: start on the main screen
    pub fn with_session(mut self, session: Option<Session>) -> Self {
        if let Some(session) = session {
            self.session = Some(session);
            self.current_screen = Screen::Main;
        }
        self
    }

    /// Setup terminal for TUI
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| ReelError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| ReelError::Terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| ReelError::Terminal(e.to_string()))?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| ReelError::Terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| ReelError::Terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| ReelError::Terminal(e.to_string()))?;
        Ok(())
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let mut events = EventHandler::new(Duration::from_millis(250));

        // Main event loop
        while self.running {
            terminal
                .draw(|frame| ui::render(frame, self))
                .map_err(|e| ReelError::Terminal(e.to_string()))?;

            // Check for async messages (non-blocking)
            while let Ok(msg) = self.async_rx.try_recv() {
                self.handle_async_message(msg);
            }

            if let Some(event) = events.next().await {
                match event {
                    AppEvent::Key(key) => self.handle_key_event(key),
                    AppEvent::Resize(_, _) => {
                        // Terminal resize is handled automatically by ratatui
                    }
                    AppEvent::Tick => {
                        self.tick_counter = self.tick_counter.wrapping_add(1);
                    }
                }
            }
        }

        Self::restore_terminal(&mut terminal)?;
        Ok(())
    }

    /// Handle async message from background tasks
    pub fn handle_async_message(&mut self, msg: AsyncMessage) {
        match msg {
            AsyncMessage::SignInFinished(result) => {
                if self.sign_in.complete(&result) == SubmitOutcome::SignedIn {
                    if let Ok(session) = result {
                        self.session = Some(session);
                    }
                    self.navigate(Screen::Main);
                }
            }
            AsyncMessage::SignOutFinished(result) => {
                self.sign_out_loading = false;
                match result {
                    Ok(()) => {
                        self.session = None;
                        self.navigate(Screen::SignIn);
                        self.status_message = Some("Signed out.".to_string());
                    }
                    Err(e) => {
                        warn!(error = %e, "sign-out failed");
                        let summary = e.to_string();
                        self.status_message = Some(format!(
                            "Sign out failed: {}",
                            summary.lines().next().unwrap_or_default()
                        ));
                    }
                }
            }
        }
    }

    /// Handle a key press
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if is_quit_key(&key) {
            self.quit();
            return;
        }

        // If help is shown, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.current_screen {
            Screen::SignIn => {
                // '?' is valid form input, so help lives on F1 here
                if key.code == KeyCode::F(1) && !self.sign_in.loading {
                    self.show_help = true;
                    return;
                }
                if self.sign_in.handle_key(key) == SignInAction::Submit {
                    self.submit_sign_in();
                }
            }
            Screen::Main => self.handle_main_key(key),
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('o') => self.sign_out(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    /// Validate the form and spawn the sign-in request
    fn submit_sign_in(&mut self) {
        let credentials = match self.sign_in.begin_submit() {
            Ok(credentials) => credentials,
            // Invalid form or already submitting: the screen has updated itself
            Err(_) => return,
        };

        let tx = self.async_tx.clone();
        let tokens = Arc::clone(&self.tokens);
        let exchange = Arc::clone(&self.exchange);

        tokio::spawn(async move {
            // A panic inside the pipeline must still end the loading state
            let pipeline = tokio::spawn(async move {
                auth::authenticate(tokens.as_ref(), exchange.as_ref(), credentials).await
            });
            let result = pipeline.await.unwrap_or_else(|e| {
                Err(ReelError::AuthenticationFailed(format!(
                    "sign-in task failed: {}",
                    e
                )))
            });
            let _ = tx.send(AsyncMessage::SignInFinished(result)).await;
        });
    }

    /// Spawn a task to end the current session
    fn sign_out(&mut self) {
        if self.sign_out_loading {
            return;
        }

        let Some(session) = self.session.clone() else {
            self.navigate(Screen::SignIn);
            return;
        };

        self.sign_out_loading = true;
        self.status_message = Some("Signing out...".to_string());

        let tx = self.async_tx.clone();
        let exchange = Arc::clone(&self.exchange);

        tokio::spawn(async move {
            let result = exchange.sign_out(&session).await;
            let _ = tx.send(AsyncMessage::SignOutFinished(result)).await;
        });
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

impl Navigator for App {
    fn navigate(&mut self, screen: Screen) {
        self.current_screen = screen;
        self.show_help = false;
        self.status_message = None; // Clear stale messages on screen change
    }
}
