//! CLI command definitions using clap
//!
//! Defines the command structure for the `reel` CLI tool.

use clap::{Parser, Subcommand, ValueEnum};

/// reel - TMDB sign-in client
///
/// A terminal application for signing in to The Movie Database.
/// Run without arguments to launch the TUI mode.
#[derive(Parser, Debug)]
#[command(name = "reel", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in to TMDB and manage the stored session
    Auth(AuthArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication commands
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in with your TMDB username and password
    Login {
        /// Username (prompted for when omitted)
        #[arg(long, short, env = "TMDB_USERNAME")]
        username: Option<String>,
    },
    /// Sign out and remove the stored session
    Logout,
    /// Show current authentication status
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Remove a configuration value
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// TMDB v3 API key (stored in the system keyring)
    #[value(name = "api-key")]
    ApiKey,

    /// Base URL of the TMDB API
    #[value(name = "api-url")]
    ApiUrl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["reel"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_login_with_username() {
        let cli = Cli::try_parse_from(["reel", "auth", "login", "-u", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Auth(args)) => match args.command {
                AuthCommand::Login { username } => assert_eq!(username.as_deref(), Some("alice")),
                other => panic!("unexpected command: {:?}", other),
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli =
            Cli::try_parse_from(["reel", "config", "set", "api-url", "http://localhost"]).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => match args.command {
                ConfigCommand::Set { key, value } => {
                    assert_eq!(key, ConfigKey::ApiUrl);
                    assert_eq!(value, "http://localhost");
                }
                other => panic!("unexpected command: {:?}", other),
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        assert!(Cli::try_parse_from(["reel", "config", "get", "session-id"]).is_err());
    }
}
