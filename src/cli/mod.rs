//! CLI module for Team Todo
//!
//! Subcommands:
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply pending schema migrations (or `--revert` the latest) and exit
//! - `delete-user`: remove an account and everything it owns

pub mod delete_user;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Team Todo - personal and team todo lists
#[derive(Parser)]
#[command(name = "team-todo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations, or revert the latest with `--revert`
    Migrate(migrate::MigrateArgs),

    /// Delete a user together with their todos and the teams they created
    DeleteUser(delete_user::DeleteUserArgs),
}

/// Load `.env` and the layered configuration, then start logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["team-todo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_delete_user_requires_username() {
        assert!(Cli::try_parse_from(["team-todo", "delete-user"]).is_err());

        let cli = Cli::try_parse_from(["team-todo", "delete-user", "--username", "alice"]).unwrap();
        match cli.command {
            Some(Command::DeleteUser(args)) => assert_eq!(args.username, "alice"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_migrate_parses() {
        let cli = Cli::try_parse_from(["team-todo", "migrate"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Migrate(migrate::MigrateArgs { revert: false }))
        );

        let cli = Cli::try_parse_from(["team-todo", "migrate", "--revert"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Migrate(migrate::MigrateArgs { revert: true }))
        );
    }
}
