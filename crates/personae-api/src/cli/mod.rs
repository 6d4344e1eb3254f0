//! CLI command definitions for the `personae` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a
//! noun-verb pattern (e.g., `personae user create`, `personae agents list`).

pub mod agent;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with AI agent personas, and manage them.
#[derive(Parser)]
#[command(name = "personae", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides `[server].port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides `[server].host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage user profiles and their access tokens.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Inspect agents.
    Agents {
        #[command(subcommand)]
        action: AgentsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a profile and print its access token once.
    Create {
        /// Display name (must be unique).
        #[arg(long)]
        username: Option<String>,

        /// Role: user or creator.
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// List profiles.
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List agents, newest first.
    #[command(alias = "ls")]
    List {
        /// Maximum number of agents to show.
        #[arg(long)]
        limit: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_user_create() {
        let cli = Cli::try_parse_from([
            "personae", "user", "create", "--username", "ana", "--role", "creator",
        ])
        .unwrap();
        match cli.command {
            Commands::User {
                action: UserCommand::Create { username, role },
            } => {
                assert_eq!(username.as_deref(), Some("ana"));
                assert_eq!(role, "creator");
            }
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["personae", "serve", "--port", "8080", "-vv", "--log-json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), host: None }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
